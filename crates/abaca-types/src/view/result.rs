use serde::Serialize;
use std::collections::BTreeMap;

use crate::Record;

/// Aggregate name → value. Values are always finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aggregates(BTreeMap<String, f64>);

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    /// Records on the current page, in display order
    pub items: Vec<Record>,
    /// Records matching the current filters, before pagination
    pub total_count: usize,
    /// Effective (clamped) page, 1-based
    pub page: usize,
    /// Always at least 1
    pub page_count: usize,
    pub page_size: usize,
    pub aggregates: Aggregates,
}

impl ViewResult {
    /// "Page 1 of 1" with nothing on it
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 1,
            page_count: 1,
            page_size: page_size.max(1),
            aggregates: Aggregates::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
