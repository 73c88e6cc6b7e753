pub mod entity;
pub mod error;
pub mod record;
pub mod view;

pub use entity::EntityKind;
pub use error::{Error, Result};
pub use record::{FieldValue, RawRecord, Record, RecordId};
pub use view::*;
