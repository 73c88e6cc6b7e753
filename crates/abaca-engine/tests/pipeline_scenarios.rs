//! End-to-end pipeline runs over marketplace fixtures.

use abaca_engine::{catalog, filtered_records, normalize_records, run_view};
use abaca_testing::fixtures;
use abaca_types::{
    EntityKind, FieldSpec, FilterSelection, Record, SortSpec, ViewConfig, ViewState,
};
use serde_json::{Value, json};

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id().as_str()).collect()
}

#[test]
fn test_planted_filter_clamps_page_two_back_to_one() {
    let config = catalog::view_config(EntityKind::Seedlings);
    let records = normalize_records(&fixtures::raw(&fixtures::seedlings(12, 5)), config);

    let mut state = ViewState::new(config);
    state
        .set_filter(config, "status", FilterSelection::from("planted"))
        .unwrap();
    state.set_page(2);

    let result = run_view(&records, config, &state);
    assert_eq!(result.total_count, 5);
    assert_eq!(result.page_count, 1);
    assert_eq!(result.page, 1);
    assert_eq!(result.items.len(), 5);
    assert_eq!(result.aggregates.get("planted"), Some(5.0));
    assert_eq!(result.aggregates.get("damaged"), Some(0.0));
}

#[test]
fn test_null_total_counts_as_zero_in_aggregates() {
    let config = catalog::view_config(EntityKind::Transactions);
    let raws = fixtures::raw(&[
        fixtures::transaction(1, "Abaca Cordage Co.", json!(100), "2024-04-01"),
        fixtures::transaction(2, "Bicol Fiber Traders", Value::Null, "2024-04-02"),
        fixtures::transaction(3, "Abaca Cordage Co.", json!(300), "2024-04-03"),
    ]);
    let records = normalize_records(&raws, config);
    assert_eq!(records[1].get("total_price").as_number(), Some(0.0));

    let result = run_view(&records, config, &ViewState::new(config));
    let aggregates = &result.aggregates;
    assert_eq!(aggregates.get("total_revenue"), Some(400.0));
    assert_eq!(aggregates.get("max_total"), Some(300.0));
    assert_eq!(aggregates.get("transaction_count"), Some(3.0));
    assert_eq!(aggregates.get("active_buyers"), Some(2.0));

    let avg = aggregates.get("avg_total").unwrap();
    assert!((avg - 133.333).abs() < 0.001, "avg_total = {}", avg);
}

#[test]
fn test_search_matches_any_searchable_field() {
    let config = ViewConfig::new(SortSpec::asc("id"))
        .field(FieldSpec::text("fiber_quality"))
        .field(FieldSpec::text("municipality"))
        .searchable(["fiber_quality", "municipality"]);
    let raws = fixtures::raw(&[
        json!({"id": "a", "fiber_quality": "Class A", "municipality": "Davao"}),
        json!({"id": "b", "fiber_quality": "Class B", "municipality": "Class A Town"}),
        json!({"id": "c", "fiber_quality": "Class C", "municipality": "Legazpi"}),
    ]);
    let records = normalize_records(&raws, &config);

    let mut state = ViewState::new(&config);
    state.set_search("class a");

    let result = run_view(&records, &config, &state);
    assert_eq!(ids(&result.items), ["a", "b"]);
}

#[test]
fn test_search_and_filter_combine_with_and() {
    let config = catalog::view_config(EntityKind::Listings);
    let records = normalize_records(&fixtures::raw(&fixtures::listings()), config);

    let mut state = ViewState::new(config);
    state.set_search("class");
    assert_eq!(run_view(&records, config, &state).total_count, 3);

    state
        .set_filter(config, "fiber_quality", FilterSelection::from("Class B"))
        .unwrap();
    let result = run_view(&records, config, &state);
    assert_eq!(ids(&result.items), ["2"]);

    state.set_search("juan");
    assert_eq!(run_view(&records, config, &state).total_count, 0);
}

#[test]
fn test_empty_result_is_page_one_of_one() {
    let config = catalog::view_config(EntityKind::Harvests);
    let records = normalize_records(&[], config);

    let result = run_view(&records, config, &ViewState::new(config));
    assert_eq!(result.page, 1);
    assert_eq!(result.page_count, 1);
    assert!(result.items.is_empty());
    assert_eq!(result.aggregates.get("avg_fiber_kg"), Some(0.0));
    assert_eq!(result.aggregates.get("max_fiber_kg"), Some(1.0));
}

#[test]
fn test_identical_timestamps_keep_input_order() {
    let config = ViewConfig::new(SortSpec::asc("created_at"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::date("created_at"));
    let raws = fixtures::raw(&[
        json!({"id": "late", "created_at": "2024-05-02T08:00:00Z"}),
        json!({"id": "first", "created_at": "2024-05-01T08:00:00Z"}),
        json!({"id": "second", "created_at": "2024-05-01T08:00:00Z"}),
        json!({"id": "undated"}),
    ]);
    let records = normalize_records(&raws, &config);

    let mut state = ViewState::new(&config);
    let result = run_view(&records, &config, &state);
    assert_eq!(ids(&result.items), ["first", "second", "late", "undated"]);

    state.set_sort(SortSpec::desc("created_at"));
    let result = run_view(&records, &config, &state);
    assert_eq!(ids(&result.items), ["late", "first", "second", "undated"]);
}

#[test]
fn test_numeric_strings_sort_numerically() {
    let config = catalog::view_config(EntityKind::Listings);
    let raws = fixtures::raw(&[
        json!({"id": 1, "price_per_kg": "95"}),
        json!({"id": 2, "price_per_kg": "1,250.50"}),
        json!({"id": 3, "price_per_kg": 120}),
    ]);
    let records = normalize_records(&raws, config);

    let mut state = ViewState::new(config);
    state.set_sort(SortSpec::desc("price_per_kg"));

    let sorted: Vec<&str> = filtered_records(&records, config, &state)
        .iter()
        .map(|r| r.id().as_str())
        .collect();
    assert_eq!(sorted, ["2", "3", "1"]);
}

#[test]
fn test_missing_fields_get_type_defaults() {
    let config = catalog::view_config(EntityKind::Seedlings);
    let raws = fixtures::raw(&[json!({"id": 7, "farmer_name": "Ana", "barangay": "San Isidro"})]);
    let records = normalize_records(&raws, config);
    let record = &records[0];

    assert_eq!(record.get("quantity").as_number(), Some(0.0));
    assert_eq!(record.text("status"), "distributed");
    assert_eq!(record.text("variety"), "");
    assert!(record.get("date_planted").is_null());
    assert_eq!(record.text("barangay"), "San Isidro");
}
