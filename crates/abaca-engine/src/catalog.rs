//! Built-in view configurations, one per marketplace entity list.

use abaca_types::{AggregateSpec, EntityKind, FieldSpec, SortSpec, ViewConfig};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub const FIBER_GRADES: [&str; 3] = ["Class A", "Class B", "Class C"];

static CATALOG: Lazy<BTreeMap<EntityKind, ViewConfig>> = Lazy::new(|| {
    EntityKind::ALL
        .into_iter()
        .map(|kind| (kind, build(kind)))
        .collect()
});

pub fn view_config(entity: EntityKind) -> &'static ViewConfig {
    &CATALOG[&entity]
}

fn build(entity: EntityKind) -> ViewConfig {
    match entity {
        EntityKind::Seedlings => seedlings(),
        EntityKind::Harvests => harvests(),
        EntityKind::Transactions => transactions(),
        EntityKind::SalesReports => sales_reports(),
        EntityKind::Listings => listings(),
    }
}

fn seedlings() -> ViewConfig {
    ViewConfig::new(SortSpec::desc("date_distributed"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::text("variety"))
        .field(FieldSpec::number("quantity"))
        .field(FieldSpec::text("status").with_default("distributed".into()))
        .field(FieldSpec::text("municipality"))
        .field(FieldSpec::date("date_distributed"))
        .field(FieldSpec::date("date_planted"))
        .searchable(["farmer_name", "variety", "municipality"])
        .filter("status", ["distributed", "planted", "damaged"])
        .date_field("date_distributed")
        .aggregate(AggregateSpec::sum("total_distributed", "quantity"))
        .aggregate(AggregateSpec::count("planted").when("status", "planted"))
        .aggregate(AggregateSpec::count("damaged").when("status", "damaged"))
        .aggregate(AggregateSpec::count_distinct("unique_farmers", "farmer_name"))
        .aggregate(AggregateSpec::max("max_quantity", "quantity"))
        .column("id", "ID")
        .column("farmer_name", "Farmer")
        .column("variety", "Variety")
        .column("quantity", "Quantity")
        .column("status", "Status")
        .column("municipality", "Municipality")
        .column("date_distributed", "Date Distributed")
        .column("date_planted", "Date Planted")
}

fn harvests() -> ViewConfig {
    ViewConfig::new(SortSpec::desc("harvest_date"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::text("municipality"))
        .field(FieldSpec::text("fiber_quality"))
        .field(FieldSpec::number("dry_fiber_output"))
        .field(FieldSpec::text("status").with_default("pending".into()))
        .field(FieldSpec::date("harvest_date"))
        .searchable(["farmer_name", "municipality", "fiber_quality"])
        .filter("status", ["pending", "verified", "rejected"])
        .filter("fiber_quality", FIBER_GRADES)
        .date_field("harvest_date")
        .aggregate(AggregateSpec::sum("total_fiber_kg", "dry_fiber_output"))
        .aggregate(AggregateSpec::avg("avg_fiber_kg", "dry_fiber_output"))
        .aggregate(AggregateSpec::count("harvest_count"))
        .aggregate(AggregateSpec::count_distinct("unique_farmers", "farmer_name"))
        .aggregate(AggregateSpec::max("max_fiber_kg", "dry_fiber_output"))
        .column("id", "ID")
        .column("farmer_name", "Farmer")
        .column("municipality", "Municipality")
        .column("fiber_quality", "Quality")
        .column("dry_fiber_output", "Dry Fiber (kg)")
        .column("status", "Status")
        .column("harvest_date", "Harvest Date")
}

fn transactions() -> ViewConfig {
    ViewConfig::new(SortSpec::desc("transaction_date"))
        .field(FieldSpec::text("buyer_name"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::text("fiber_quality"))
        .field(FieldSpec::number("quantity"))
        .field(FieldSpec::number("price_per_kg"))
        .field(FieldSpec::number("total_price"))
        .field(FieldSpec::text("status").with_default("pending".into()))
        .field(FieldSpec::date("transaction_date"))
        .searchable(["buyer_name", "farmer_name", "fiber_quality"])
        .filter("status", ["pending", "completed", "cancelled"])
        .date_field("transaction_date")
        .aggregate(AggregateSpec::sum("total_revenue", "total_price"))
        .aggregate(AggregateSpec::avg("avg_total", "total_price"))
        .aggregate(AggregateSpec::count("transaction_count"))
        .aggregate(AggregateSpec::count_distinct("active_buyers", "buyer_name"))
        .aggregate(AggregateSpec::max("max_total", "total_price"))
        .column("id", "ID")
        .column("transaction_date", "Date")
        .column("buyer_name", "Buyer")
        .column("farmer_name", "Farmer")
        .column("fiber_quality", "Quality")
        .column("quantity", "Quantity (kg)")
        .column("price_per_kg", "Price/kg")
        .column("total_price", "Total")
        .column("status", "Status")
}

fn sales_reports() -> ViewConfig {
    ViewConfig::new(SortSpec::desc("created_at"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::text("buyer_name"))
        .field(FieldSpec::text("fiber_quality"))
        .field(FieldSpec::number("quantity_sold"))
        .field(FieldSpec::number("total_amount"))
        .field(FieldSpec::text("status").with_default("pending".into()))
        .field(FieldSpec::date("sale_date"))
        .field(FieldSpec::date("created_at"))
        .searchable(["farmer_name", "buyer_name", "fiber_quality"])
        .filter("status", ["pending", "approved", "rejected"])
        .date_field("sale_date")
        .aggregate(AggregateSpec::count("pending").when("status", "pending"))
        .aggregate(AggregateSpec::count("approved").when("status", "approved"))
        .aggregate(AggregateSpec::count("rejected").when("status", "rejected"))
        .aggregate(AggregateSpec::sum("total_amount", "total_amount"))
        .aggregate(AggregateSpec::count_distinct("unique_farmers", "farmer_name"))
        .aggregate(AggregateSpec::max("max_amount", "total_amount"))
        .column("id", "ID")
        .column("sale_date", "Sale Date")
        .column("farmer_name", "Farmer")
        .column("buyer_name", "Buyer")
        .column("fiber_quality", "Quality")
        .column("quantity_sold", "Quantity (kg)")
        .column("total_amount", "Amount")
        .column("status", "Status")
}

fn listings() -> ViewConfig {
    ViewConfig::new(SortSpec::desc("created_at"))
        .field(FieldSpec::text("farmer_name"))
        .field(FieldSpec::text("fiber_quality"))
        .field(FieldSpec::number("price_per_kg"))
        .field(FieldSpec::number("quantity_available"))
        .field(FieldSpec::text("availability").with_default("available".into()))
        .field(FieldSpec::text("municipality"))
        .field(FieldSpec::date("created_at"))
        .searchable(["fiber_quality", "municipality", "farmer_name"])
        .filter("fiber_quality", FIBER_GRADES)
        .filter("availability", ["available", "reserved", "sold_out"])
        .date_field("created_at")
        .page_sizes(vec![12, 24, 48])
        .aggregate(AggregateSpec::avg("avg_price", "price_per_kg"))
        .aggregate(AggregateSpec::sum("total_stock", "quantity_available"))
        .aggregate(AggregateSpec::count("listing_count"))
        .aggregate(AggregateSpec::max("max_price", "price_per_kg"))
        .column("id", "ID")
        .column("farmer_name", "Farmer")
        .column("fiber_quality", "Quality")
        .column("price_per_kg", "Price/kg")
        .column("quantity_available", "Available (kg)")
        .column("availability", "Availability")
        .column("municipality", "Municipality")
}

/// The `max` aggregate used to scale proportional bars, if the view has one
pub fn bar_scale(config: &ViewConfig) -> Option<(&str, &str)> {
    config
        .aggregates
        .iter()
        .find(|a| a.op == abaca_types::AggregateOp::Max && a.when.is_none())
        .and_then(|a| a.field.as_deref().map(|field| (a.name.as_str(), field)))
}
