use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::config::{SortDirection, SortSpec, ViewConfig};
use crate::{Error, Result};

/// Current value of one categorical filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterSelection {
    /// The `all` sentinel: every record passes
    #[default]
    All,
    Only(String),
}

impl FilterSelection {
    pub fn is_all(&self) -> bool {
        matches!(self, FilterSelection::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FilterSelection::All => None,
            FilterSelection::Only(v) => Some(v),
        }
    }
}

impl From<String> for FilterSelection {
    fn from(s: String) -> Self {
        if s == "all" {
            FilterSelection::All
        } else {
            FilterSelection::Only(s)
        }
    }
}

impl From<&str> for FilterSelection {
    fn from(s: &str) -> Self {
        FilterSelection::from(s.to_string())
    }
}

impl From<FilterSelection> for String {
    fn from(selection: FilterSelection) -> Self {
        match selection {
            FilterSelection::All => "all".to_string(),
            FilterSelection::Only(v) => v,
        }
    }
}

impl FromStr for FilterSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(FilterSelection::from(s))
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelection::All => f.write_str("all"),
            FilterSelection::Only(v) => f.write_str(v),
        }
    }
}

/// Inclusive calendar-date bounds; an open side is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(Error::InvalidInput(format!(
                "date range starts after it ends ({} > {})",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Mutable, user-driven selection for one screen.
///
/// Page resets to 1 whenever search text, a filter, the date range, or the
/// page size actually changes. Sorting and paging keep the current page; the
/// paginator clamps it if needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    search: String,
    filters: BTreeMap<String, FilterSelection>,
    date_range: DateRange,
    sort: SortSpec,
    page: usize,
    page_size: usize,
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            search: String::new(),
            filters: config
                .filters
                .iter()
                .map(|f| (f.field.clone(), FilterSelection::All))
                .collect(),
            date_range: DateRange::default(),
            sort: config.default_sort.clone(),
            page: 1,
            page_size: config.default_page_size(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self, field: &str) -> &FilterSelection {
        static ALL: FilterSelection = FilterSelection::All;
        self.filters.get(field).unwrap_or(&ALL)
    }

    /// Filters that are not `all`, in field order
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter_map(|(field, sel)| sel.value().map(|v| (field.as_str(), v)))
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Requested page (1-based), before clamping
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search {
            self.search = text;
            self.page = 1;
        }
    }

    pub fn set_filter(
        &mut self,
        config: &ViewConfig,
        field: &str,
        selection: FilterSelection,
    ) -> Result<()> {
        let spec = config.filter_spec(field).ok_or_else(|| {
            Error::InvalidInput(format!("'{}' is not a filterable field", field))
        })?;
        if let FilterSelection::Only(value) = &selection
            && !spec.values.iter().any(|v| v == value)
        {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid {} (expected one of: all, {})",
                value,
                field,
                spec.values.join(", ")
            )));
        }

        if self.filter(field) != &selection {
            self.filters.insert(field.to_string(), selection);
            self.page = 1;
        }
        Ok(())
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        if range != self.date_range {
            self.date_range = range;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Same field flips direction; a new field starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort.field == field {
            self.sort.direction = self.sort.direction.reverse();
        } else {
            self.sort = SortSpec {
                field: field.to_string(),
                direction: SortDirection::Asc,
            };
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.page_size {
            self.page_size = page_size;
            self.page = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::config::FieldSpec;

    fn config() -> ViewConfig {
        ViewConfig::new(SortSpec::asc("farmer_name"))
            .field(FieldSpec::text("farmer_name"))
            .field(FieldSpec::text("status"))
            .filter("status", ["pending", "approved", "rejected"])
            .page_sizes(vec![25, 50])
    }

    #[test]
    fn test_defaults() {
        let state = ViewState::new(&config());
        assert_eq!(state.search(), "");
        assert!(state.filter("status").is_all());
        assert_eq!(state.sort(), &SortSpec::asc("farmer_name"));
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.active_filters().count(), 0);
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let config = config();
        let mut state = ViewState::new(&config);

        state.set_page(4);
        state.set_search("dela cruz");
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state
            .set_filter(&config, "status", FilterSelection::from("approved"))
            .unwrap();
        assert_eq!(state.page(), 1);
        assert_eq!(
            state.active_filters().collect::<Vec<_>>(),
            vec![("status", "approved")]
        );
    }

    #[test]
    fn test_unchanged_inputs_keep_page() {
        let config = config();
        let mut state = ViewState::new(&config);
        state.set_search("abc");
        state.set_page(2);

        state.set_search("abc");
        state.set_filter(&config, "status", FilterSelection::All).unwrap();
        state.set_page_size(25);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_sort_and_page_do_not_reset() {
        let mut state = ViewState::new(&config());
        state.set_page(3);
        state.set_sort(SortSpec::desc("status"));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_page_size_resets_page() {
        let mut state = ViewState::new(&config());
        state.set_page(3);
        state.set_page_size(50);
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 50);

        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = ViewState::new(&config());
        state.toggle_sort("farmer_name");
        assert_eq!(state.sort(), &SortSpec::desc("farmer_name"));
        state.toggle_sort("status");
        assert_eq!(state.sort(), &SortSpec::asc("status"));
    }

    #[test]
    fn test_set_filter_rejects_unknown_values() {
        let config = config();
        let mut state = ViewState::new(&config);
        assert!(matches!(
            state.set_filter(&config, "status", FilterSelection::from("Approved")),
            Err(Error::InvalidInput(_))
        ));
        assert!(
            state
                .set_filter(&config, "farmer_name", FilterSelection::from("x"))
                .is_err()
        );
    }

    #[test]
    fn test_date_range() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 1, 31);
        let range = DateRange::new(from, to).unwrap();
        let inside = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap()
            .and_utc();
        let outside = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert!(range.contains(inside));
        assert!(!range.contains(outside));
        assert!(DateRange::new(to, from).is_err());
        assert!(!DateRange::default().is_active());
    }

    #[test]
    fn test_filter_selection_sentinel() {
        assert_eq!(FilterSelection::from("all"), FilterSelection::All);
        assert_eq!(String::from(FilterSelection::All), "all");
        assert_eq!(
            FilterSelection::from("planted").value(),
            Some("planted")
        );
    }
}
