use abaca_types::{DateRange, FilterSelection, Record, ViewConfig, ViewState};

/// Combined inclusion test: free-text search AND every active filter.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    /// Lowercased, trimmed search term; empty matches everything
    needle: String,
    search_fields: Vec<String>,
    categorical: Vec<(String, String)>,
    date: Option<(String, DateRange)>,
}

impl Predicate {
    /// Search-only predicate over the given fields
    pub fn build(search_text: &str, searchable_fields: &[String]) -> Self {
        Self {
            needle: search_text.trim().to_lowercase(),
            search_fields: searchable_fields.to_vec(),
            categorical: Vec::new(),
            date: None,
        }
    }

    /// Predicate for the current state of a screen
    pub fn for_view(config: &ViewConfig, state: &ViewState) -> Self {
        let mut predicate = Self::build(state.search(), &config.searchable);
        for (field, value) in state.active_filters() {
            predicate = predicate.with_filter(field, &FilterSelection::Only(value.to_string()));
        }
        if let Some(date_field) = &config.date_field {
            predicate = predicate.with_date_range(date_field, state.date_range());
        }
        predicate
    }

    /// Add a categorical condition. `all` adds nothing.
    pub fn with_filter(mut self, field: &str, selection: &FilterSelection) -> Self {
        if let Some(value) = selection.value() {
            self.categorical.push((field.to_string(), value.to_string()));
        }
        self
    }

    /// Add a date-range condition. An inactive range adds nothing.
    pub fn with_date_range(mut self, field: &str, range: DateRange) -> Self {
        if range.is_active() {
            self.date = Some((field.to_string(), range));
        }
        self
    }

    /// Any searchable field contains the term, case-insensitively
    pub fn matches_search(&self, record: &Record) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.search_fields
            .iter()
            .any(|field| record.text(field).to_lowercase().contains(&self.needle))
    }

    /// Every categorical value matches exactly and the date is within range
    pub fn matches_filters(&self, record: &Record) -> bool {
        let categorical = self
            .categorical
            .iter()
            .all(|(field, value)| record.text(field) == value.as_str());

        let in_range = match &self.date {
            Some((field, range)) => record
                .get(field)
                .as_date()
                .is_some_and(|at| range.contains(at)),
            None => true,
        };

        categorical && in_range
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record) && self.matches_filters(record)
    }
}
