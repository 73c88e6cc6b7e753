// Engine module - the tabular view pipeline (normalize, filter, sort, aggregate, paginate)
// This layer sits between raw API records (types) and the runtime/CLI

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod export;
pub mod normalize;
pub mod paginate;
pub mod pipeline;
pub mod predicate;
pub mod sort;

pub use aggregate::{aggregate, ratio};
pub use error::{Error, Result};
pub use export::{ExportFormat, export, export_csv, export_json, write_csv};
pub use normalize::{normalize, normalize_all, parse_date};
pub use paginate::{Page, page_count, paginate};
pub use predicate::Predicate;
pub use sort::{compare, sort_records};

use abaca_types::{RawRecord, Record, ViewConfig, ViewResult, ViewState};

// Façade API - Stable public interface for runtime and CLI layers

/// Normalize a fetched list for one view
pub fn normalize_records(raws: &[RawRecord], config: &ViewConfig) -> Vec<Record> {
    normalize::normalize_all(raws, config)
}

/// Run the full pipeline and produce the page to display
pub fn run_view(records: &[Record], config: &ViewConfig, state: &ViewState) -> ViewResult {
    pipeline::run(records, config, state)
}

/// Filtered and sorted records without pagination (export input)
pub fn filtered_records<'a>(
    records: &'a [Record],
    config: &ViewConfig,
    state: &ViewState,
) -> Vec<&'a Record> {
    pipeline::filter_and_sort(records, config, state)
}
