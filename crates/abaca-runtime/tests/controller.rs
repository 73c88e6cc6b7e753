//! View controller behavior against in-memory collaborators.

use abaca_engine::ExportFormat;
use abaca_runtime::{Error, Mutation, Notice, Phase, QueryParams, ViewController};
use abaca_testing::fakes::{FailingFetcher, RecordingMutator, StaticFetcher};
use abaca_testing::fixtures;
use abaca_types::{DateRange, EntityKind, FilterSelection, SortSpec};
use chrono::NaiveDate;

fn ids(controller: &ViewController) -> Vec<String> {
    controller
        .result()
        .items
        .iter()
        .map(|r| r.id().to_string())
        .collect()
}

async fn loaded_seedlings(total: u32, planted: u32) -> (ViewController, StaticFetcher) {
    let fetcher = StaticFetcher::new(fixtures::seedlings(total, planted));
    let mut controller = ViewController::builtin(EntityKind::Seedlings);
    assert_eq!(controller.load(&fetcher).await, Phase::Ready);
    (controller, fetcher)
}

#[tokio::test]
async fn test_load_runs_pipeline_with_defaults() {
    let (controller, fetcher) = loaded_seedlings(12, 5).await;

    assert_eq!(fetcher.calls(), 1);
    let result = controller.result();
    assert_eq!(result.total_count, 12);
    assert_eq!(result.page, 1);
    assert_eq!(result.page_count, 2);
    assert_eq!(result.items.len(), 10);
    assert_eq!(result.aggregates.get("total_distributed"), Some(780.0));
    assert_eq!(result.aggregates.get("planted"), Some(5.0));
    assert_eq!(result.aggregates.get("unique_farmers"), Some(4.0));
    assert_eq!(result.aggregates.get("max_quantity"), Some(120.0));
    assert_eq!(controller.notice(), None);

    // default sort: newest distribution first
    assert_eq!(ids(&controller)[..3], ["12", "11", "10"]);
}

#[tokio::test]
async fn test_filter_change_resets_page() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller.set_page(2);
    assert_eq!(controller.result().page, 2);
    assert_eq!(controller.result().items.len(), 2);

    controller
        .set_filter("status", FilterSelection::from("planted"))
        .unwrap();
    let result = controller.result();
    assert_eq!(controller.state().page(), 1);
    assert_eq!(result.page, 1);
    assert_eq!(result.page_count, 1);
    assert_eq!(result.items.len(), 5);
    assert!(result.items.iter().all(|r| r.text("status") == "planted"));
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller
        .set_filter("status", FilterSelection::from("planted"))
        .unwrap();
    controller.set_page(3);

    let result = controller.result();
    assert_eq!(result.page, 1);
    assert_eq!(result.items.len(), 5);
}

#[tokio::test]
async fn test_unknown_filter_value_is_rejected() {
    let (mut controller, _) = loaded_seedlings(3, 1).await;
    let before = controller.result().clone();

    let err = controller
        .set_filter("status", FilterSelection::from("lost"))
        .unwrap_err();
    assert!(matches!(err, Error::Types(_)));
    assert_eq!(controller.result(), &before);
}

#[tokio::test]
async fn test_search_and_date_range_narrow_results() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller.set_search("  MARIA ");
    assert_eq!(controller.result().total_count, 3);
    assert!(
        controller
            .result()
            .items
            .iter()
            .all(|r| r.text("farmer_name") == "Maria Santos")
    );

    controller.set_search("");
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 5),
        NaiveDate::from_ymd_opt(2024, 3, 7),
    )
    .unwrap();
    controller.set_date_range(range);
    assert_eq!(controller.result().total_count, 3);
    assert_eq!(ids(&controller), ["7", "6", "5"]);
}

#[tokio::test]
async fn test_toggle_sort_keeps_page() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller.set_page(2);
    controller.set_sort(SortSpec::asc("quantity"));
    assert_eq!(controller.result().page, 2);
    assert_eq!(ids(&controller), ["11", "12"]);

    controller.toggle_sort("quantity");
    assert_eq!(ids(&controller), ["2", "1"]);
}

#[tokio::test]
async fn test_next_and_previous_page_stay_in_bounds() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller.previous_page();
    assert_eq!(controller.result().page, 1);

    controller.next_page();
    controller.next_page();
    assert_eq!(controller.result().page, 2);

    controller.previous_page();
    assert_eq!(controller.result().page, 1);
}

#[tokio::test]
async fn test_repeated_change_is_idempotent() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;

    controller.set_search("pedro");
    let first = controller.result().clone();
    controller.set_search("pedro");
    assert_eq!(controller.result(), &first);
}

#[tokio::test]
async fn test_stale_fetch_result_is_discarded() {
    let mut controller = ViewController::builtin(EntityKind::Seedlings);

    let first = controller.begin_fetch();
    let second = controller.begin_fetch();
    assert_eq!(controller.phase(), Phase::Loading);

    assert!(controller.complete_fetch(second, Ok(fixtures::raw(&fixtures::seedlings(2, 0)))));
    assert!(!controller.complete_fetch(first, Ok(fixtures::raw(&fixtures::seedlings(9, 9)))));

    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.records().len(), 2);
    assert_eq!(controller.result().total_count, 2);
}

#[tokio::test]
async fn test_query_change_invalidates_in_flight_fetch() {
    let mut controller = ViewController::builtin(EntityKind::SalesReports);

    let ticket = controller.begin_fetch();
    controller.set_query(QueryParams::new().with("year", "2024"));
    assert_eq!(controller.phase(), Phase::Loading);

    let report = fixtures::sales_report(1, "Juan Dela Cruz", "pending", 1500.0, "2023-12-01");
    assert!(!controller.complete_fetch(ticket, Ok(fixtures::raw(&[report]))));
    assert!(controller.records().is_empty());
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.notice(), None);
}

#[tokio::test]
async fn test_invalidated_refetch_restores_settled_phase() {
    let (mut controller, _) = loaded_seedlings(0, 0).await;
    assert_eq!(controller.notice(), Some(Notice::Empty));

    let ticket = controller.begin_fetch();
    assert_eq!(controller.notice(), None);
    controller.set_query(QueryParams::new().with("status", "planted"));

    assert!(!controller.complete_fetch(ticket, Ok(fixtures::raw(&fixtures::seedlings(4, 4)))));
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.notice(), Some(Notice::Empty));

    // a failed load is the settled phase the next invalidation returns to
    controller.load(&FailingFetcher::new(500)).await;
    let ticket = controller.begin_fetch();
    controller.set_query(QueryParams::new());
    assert!(!controller.complete_fetch(ticket, Ok(Vec::new())));
    assert_eq!(controller.phase(), Phase::Error);
    assert_eq!(controller.notice(), Some(Notice::LoadFailed));
}

#[tokio::test]
async fn test_superseded_fetch_keeps_loading_until_newest_resolves() {
    let mut controller = ViewController::builtin(EntityKind::Seedlings);

    let first = controller.begin_fetch();
    let second = controller.begin_fetch();
    assert!(!controller.complete_fetch(first, Ok(Vec::new())));
    assert_eq!(controller.phase(), Phase::Loading);

    assert!(controller.complete_fetch(second, Ok(fixtures::raw(&fixtures::seedlings(3, 0)))));
    assert_eq!(controller.phase(), Phase::Ready);
}

#[tokio::test]
async fn test_query_params_reach_fetcher() {
    let fetcher = StaticFetcher::new(Vec::new());
    let mut controller = ViewController::builtin(EntityKind::SalesReports);

    let query = QueryParams::new().with("year", "2024").with("month", "5");
    controller.set_query(query.clone());
    controller.load(&fetcher).await;

    assert_eq!(fetcher.queries(), vec![query]);
}

#[tokio::test]
async fn test_failed_fetch_keeps_last_result() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;
    let before = controller.result().clone();

    assert_eq!(controller.load(&FailingFetcher::new(503)).await, Phase::Error);

    assert_eq!(controller.result(), &before);
    assert_eq!(controller.records().len(), 12);
    assert_eq!(controller.notice(), Some(Notice::LoadFailed));
    assert!(controller.last_error().unwrap_or_default().contains("503"));

    // local changes still work on the retained records
    controller.set_page(2);
    assert_eq!(controller.result().page, 2);
}

#[tokio::test]
async fn test_empty_list_notice_and_aggregates() {
    let fetcher = StaticFetcher::new(Vec::new());
    let mut controller = ViewController::builtin(EntityKind::Seedlings);
    controller.load(&fetcher).await;

    let result = controller.result();
    assert_eq!(result.total_count, 0);
    assert_eq!(result.page, 1);
    assert_eq!(result.page_count, 1);
    assert_eq!(result.aggregates.get("total_distributed"), Some(0.0));
    assert_eq!(result.aggregates.get("max_quantity"), Some(1.0));
    assert_eq!(controller.notice(), Some(Notice::Empty));
    assert_eq!(Notice::Empty.message(), "No records found.");
}

#[tokio::test]
async fn test_successful_mutation_refetches() {
    let fetcher = StaticFetcher::new(fixtures::seedlings(12, 5));
    let mutator = RecordingMutator::backed_by(&fetcher);
    let mut controller = ViewController::builtin(EntityKind::Seedlings);
    controller.load(&fetcher).await;

    let phase = controller
        .mutate(&mutator, &fetcher, &Mutation::set_status("9", "planted"))
        .await
        .unwrap();

    assert_eq!(phase, Phase::Ready);
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(mutator.applied().len(), 1);
    assert_eq!(controller.result().aggregates.get("planted"), Some(6.0));
}

#[tokio::test]
async fn test_failed_mutation_leaves_state_untouched() {
    let (mut controller, fetcher) = loaded_seedlings(12, 5).await;
    controller.set_page(2);
    let before = controller.result().clone();

    let err = controller
        .mutate(
            &RecordingMutator::failing(),
            &fetcher,
            &Mutation::set_status("1", "damaged"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 422, .. }));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(controller.result(), &before);
    assert_eq!(controller.phase(), Phase::Ready);
}

#[tokio::test]
async fn test_unmounted_view_ignores_results_and_rejects_mutations() {
    let fetcher = StaticFetcher::new(fixtures::seedlings(4, 0));
    let mut controller = ViewController::builtin(EntityKind::Seedlings);

    let ticket = controller.begin_fetch();
    controller.unmount();
    assert!(!controller.complete_fetch(ticket, Ok(fixtures::raw(&fetcher.list()))));
    assert!(controller.records().is_empty());

    let err = controller
        .mutate(&RecordingMutator::new(), &fetcher, &Mutation::set_status("1", "planted"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_export_uses_filtered_set_across_pages() {
    let (mut controller, _) = loaded_seedlings(12, 5).await;
    controller.set_page(2);

    let csv = controller.export(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 13);
    assert!(lines[0].starts_with("\"ID\",\"Farmer\""));

    controller
        .set_filter("status", FilterSelection::from("planted"))
        .unwrap();
    let csv = controller.export(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 6);
}
