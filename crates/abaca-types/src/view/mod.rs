//! View model: static per-screen configuration, mutable UI state, and the
//! computed result of one pipeline run.

mod config;
mod result;
mod state;

pub use config::{
    AggregateOp, AggregateSpec, ColumnSpec, Condition, FieldKind, FieldSpec, FilterSpec,
    SortDirection, SortSpec, ViewConfig,
};
pub use result::{Aggregates, ViewResult};
pub use state::{DateRange, FilterSelection, ViewState};
