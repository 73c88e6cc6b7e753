use abaca_types::{Record, ViewConfig, ViewResult, ViewState};

use crate::aggregate::aggregate;
use crate::paginate::paginate;
use crate::predicate::Predicate;
use crate::sort::sort_records;

/// Records passing the current search and filters, in display order
pub fn filter_and_sort<'a>(
    records: &'a [Record],
    config: &ViewConfig,
    state: &ViewState,
) -> Vec<&'a Record> {
    let predicate = Predicate::for_view(config, state);
    let mut matched: Vec<&Record> = records.iter().filter(|r| predicate.matches(r)).collect();
    sort_records(&mut matched, state.sort());
    matched
}

/// One full pipeline run: filter → sort → aggregate → paginate.
///
/// Pure in (records, config, state); running it twice on the same inputs
/// yields identical results.
pub fn run(records: &[Record], config: &ViewConfig, state: &ViewState) -> ViewResult {
    let matched = filter_and_sort(records, config, state);
    let aggregates = aggregate(&matched, &config.aggregates);
    let page = paginate(&matched, state.page_size(), state.page());

    ViewResult {
        items: page.items.iter().map(|r| (*r).clone()).collect(),
        total_count: matched.len(),
        page: page.page,
        page_count: page.page_count,
        page_size: state.page_size().max(1),
        aggregates,
    }
}
