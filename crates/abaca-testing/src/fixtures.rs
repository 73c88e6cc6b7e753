//! Sample marketplace records.
//!
//! Builders return `serde_json::Value` objects shaped like backend list
//! items, so tests exercise normalization the same way real responses do.

use abaca_types::RawRecord;
use serde_json::{Value, json};

const FARMERS: [&str; 4] = [
    "Juan Dela Cruz",
    "Maria Santos",
    "Pedro Reyes",
    "Ana Villanueva",
];

const MUNICIPALITIES: [&str; 3] = ["Catanduanes", "Sorsogon", "Albay"];

pub fn seedling(id: u32, farmer: &str, status: &str, quantity: u32, date: &str) -> Value {
    json!({
        "id": id,
        "farmer_name": farmer,
        "variety": "Musa textilis",
        "quantity": quantity,
        "status": status,
        "municipality": MUNICIPALITIES[id as usize % MUNICIPALITIES.len()],
        "date_distributed": date,
    })
}

/// `total` seedling batches, the first `planted` of them planted.
/// Batch `n` has quantity `n * 10` and was distributed on 2024-03-`n`.
pub fn seedlings(total: u32, planted: u32) -> Vec<Value> {
    (1..=total)
        .map(|n| {
            let status = if n <= planted { "planted" } else { "distributed" };
            let farmer = FARMERS[(n as usize - 1) % FARMERS.len()];
            seedling(n, farmer, status, n * 10, &format!("2024-03-{:02}", n))
        })
        .collect()
}

pub fn transaction(id: u32, buyer: &str, total_price: Value, date: &str) -> Value {
    json!({
        "id": id,
        "buyer_name": buyer,
        "farmer_name": FARMERS[id as usize % FARMERS.len()],
        "fiber_quality": "Class A",
        "quantity": 10,
        "price_per_kg": 85.5,
        "total_price": total_price,
        "status": "completed",
        "transaction_date": date,
    })
}

pub fn listing(id: u32, farmer: &str, quality: &str, price: f64, available: u32) -> Value {
    json!({
        "id": id,
        "farmer_name": farmer,
        "fiber_quality": quality,
        "price_per_kg": price,
        "quantity_available": available,
        "availability": "available",
        "municipality": MUNICIPALITIES[id as usize % MUNICIPALITIES.len()],
        "created_at": format!("2024-05-{:02}T08:00:00Z", id.clamp(1, 28)),
    })
}

/// Three listings, one per fiber grade
pub fn listings() -> Vec<Value> {
    vec![
        listing(1, "Juan Dela Cruz", "Class A", 120.0, 50),
        listing(2, "Maria Santos", "Class B", 95.0, 80),
        listing(3, "Pedro Reyes", "Class C", 70.0, 0),
    ]
}

pub fn sales_report(id: u32, farmer: &str, status: &str, amount: f64, sale_date: &str) -> Value {
    json!({
        "id": id,
        "farmer_name": farmer,
        "buyer_name": "Bicol Fiber Traders",
        "fiber_quality": "Class B",
        "quantity_sold": 25,
        "total_amount": amount,
        "status": status,
        "sale_date": sale_date,
        "created_at": format!("{}T09:30:00Z", sale_date),
    })
}

/// Wrap values as raw records, dropping anything that is not an object
pub fn raw(values: &[Value]) -> Vec<RawRecord> {
    values
        .iter()
        .cloned()
        .filter_map(RawRecord::from_value)
        .collect()
}
