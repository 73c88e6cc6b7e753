use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Declared type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// A field the normalizer guarantees to be present on every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Entity-specific default used when the raw value is missing or unusable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Categorical (enum-valued) filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    /// Allowed values; the `all` sentinel is implicit
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortSpec {
    type Err = String;

    /// Parses `field` or `field:asc|desc`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, dir)) => (field, dir.parse()?),
            None => (s, SortDirection::Asc),
        };
        if field.is_empty() {
            return Err("Sort field must not be empty".to_string());
        }
        Ok(SortSpec {
            field: field.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Sum,
    Avg,
    Count,
    CountDistinct,
    Max,
}

impl AggregateOp {
    fn needs_number(self) -> bool {
        matches!(self, AggregateOp::Sum | AggregateOp::Avg | AggregateOp::Max)
    }
}

/// Restricts an aggregate to records whose field equals a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub equals: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub name: String,
    pub op: AggregateOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

impl AggregateSpec {
    fn new(name: impl Into<String>, op: AggregateOp, field: Option<String>) -> Self {
        Self {
            name: name.into(),
            op,
            field,
            when: None,
        }
    }

    pub fn sum(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(name, AggregateOp::Sum, Some(field.into()))
    }

    pub fn avg(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(name, AggregateOp::Avg, Some(field.into()))
    }

    pub fn count(name: impl Into<String>) -> Self {
        Self::new(name, AggregateOp::Count, None)
    }

    pub fn count_distinct(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(name, AggregateOp::CountDistinct, Some(field.into()))
    }

    pub fn max(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(name, AggregateOp::Max, Some(field.into()))
    }

    pub fn when(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.when = Some(Condition {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }
}

/// Export column: record field and its header text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    pub header: String,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
        }
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_page_sizes() -> Vec<usize> {
    vec![10, 25, 50]
}

/// How one screen interprets its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Fields matched by the free-text search, in order
    #[serde(default)]
    pub searchable: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    /// Date field used by the date-range filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_field: Option<String>,
    pub default_sort: SortSpec,
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl ViewConfig {
    pub fn new(default_sort: SortSpec) -> Self {
        Self {
            id_field: default_id_field(),
            fields: Vec::new(),
            searchable: Vec::new(),
            filters: Vec::new(),
            date_field: None,
            default_sort,
            page_sizes: default_page_sizes(),
            aggregates: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(FilterSpec {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = Some(field.into());
        self
    }

    pub fn page_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.page_sizes = sizes.into();
        self
    }

    pub fn aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregates.push(spec);
        self
    }

    pub fn column(mut self, field: impl Into<String>, header: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec::new(field, header));
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.field_spec(name).map(|f| f.kind)
    }

    pub fn filter_spec(&self, field: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.field == field)
    }

    pub fn default_page_size(&self) -> usize {
        self.page_sizes.first().copied().unwrap_or(10).max(1)
    }

    /// Configured export columns, or id plus every declared field
    pub fn export_columns(&self) -> Vec<ColumnSpec> {
        if !self.columns.is_empty() {
            return self.columns.clone();
        }
        std::iter::once(ColumnSpec::new("id", "id"))
            .chain(
                self.fields
                    .iter()
                    .filter(|f| f.name != "id")
                    .map(|f| ColumnSpec::new(&f.name, &f.name)),
            )
            .collect()
    }

    fn is_known(&self, name: &str) -> bool {
        name == "id" || self.field_spec(name).is_some()
    }

    fn require_known(&self, name: &str, context: &str) -> Result<()> {
        if self.is_known(name) {
            Ok(())
        } else {
            Err(Error::InvalidConfig(format!(
                "{} references undeclared field '{}'",
                context, name
            )))
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id_field.is_empty() {
            return Err(Error::InvalidConfig("id_field must not be empty".to_string()));
        }
        if self.page_sizes.is_empty() || self.page_sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "page_sizes must list at least one non-zero size".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "field '{}' is declared twice",
                    field.name
                )));
            }
        }

        for field in &self.searchable {
            self.require_known(field, "searchable")?;
        }

        for filter in &self.filters {
            self.require_known(&filter.field, "filter")?;
            if filter.values.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "filter '{}' has no values",
                    filter.field
                )));
            }
        }

        if let Some(date_field) = &self.date_field
            && self.field_kind(date_field) != Some(FieldKind::Date)
        {
            return Err(Error::InvalidConfig(format!(
                "date_field '{}' must be a declared date field",
                date_field
            )));
        }

        self.require_known(&self.default_sort.field, "default_sort")?;

        let mut aggregate_names = HashSet::new();
        for spec in &self.aggregates {
            if !aggregate_names.insert(spec.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "aggregate '{}' is declared twice",
                    spec.name
                )));
            }
            match (&spec.field, spec.op) {
                (None, AggregateOp::Count) => {}
                (None, _) => {
                    return Err(Error::InvalidConfig(format!(
                        "aggregate '{}' needs a field",
                        spec.name
                    )));
                }
                (Some(field), op) => {
                    self.require_known(field, &format!("aggregate '{}'", spec.name))?;
                    if op.needs_number() && self.field_kind(field) != Some(FieldKind::Number) {
                        return Err(Error::InvalidConfig(format!(
                            "aggregate '{}' needs a number field, '{}' is not one",
                            spec.name, field
                        )));
                    }
                }
            }
            if let Some(condition) = &spec.when {
                self.require_known(&condition.field, &format!("aggregate '{}'", spec.name))?;
            }
        }

        Ok(())
    }
}
