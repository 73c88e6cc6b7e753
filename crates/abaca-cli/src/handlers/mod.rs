mod context;

pub mod entities;
pub mod export;
pub mod status;
pub mod view;

pub use context::{http_client, load_view};
