//! Terminal and JSON rendering of view results.

pub mod formatters;
mod style;
mod view_models;
mod views;

pub use style::Style;
pub use view_models::{BarScale, ListViewModel};
pub use views::ListView;
