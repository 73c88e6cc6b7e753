use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

/// Envelope keys under which list endpoints nest their array payload
const ENVELOPE_KEYS: [&str; 3] = ["data", "items", "results"];

static NULL_VALUE: FieldValue = FieldValue::Null;

/// Opaque record identifier, unique within one fetched list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A normalized, type-correct field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Finite numeric value; NaN and infinities are treated as absent
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::Date(d) => {
                if d.hour() == 0 && d.minute() == 0 && d.second() == 0 && d.nanosecond() == 0 {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    f.write_str(&d.to_rfc3339_opts(SecondsFormat::Secs, true))
                }
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            FieldValue::Number(_) => serializer.serialize_none(),
            FieldValue::Date(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

/// Render a number without a trailing `.0` when it is integral
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// An API record exactly as received, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Decode a list response body.
    ///
    /// Accepts a bare array or an object envelope carrying the array under
    /// `data`, `items` or `results`. Entries that are not objects are dropped.
    pub fn list_from_json(value: Value) -> Result<Vec<RawRecord>> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut map) => {
                let key = ENVELOPE_KEYS
                    .iter()
                    .find(|k| matches!(map.get(**k), Some(Value::Array(_))));
                match key.and_then(|k| map.remove(*k)) {
                    Some(Value::Array(entries)) => entries,
                    _ => {
                        return Err(Error::InvalidInput(
                            "expected a JSON array or an object with a data/items/results array"
                                .to_string(),
                        ));
                    }
                }
            }
            other => {
                return Err(Error::InvalidInput(format!(
                    "expected a JSON array of records, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match RawRecord::from_value(entry) {
                Some(record) => records.push(record),
                None => tracing::warn!(index, "dropping non-object list entry"),
            }
        }
        Ok(records)
    }

    pub fn list_from_slice(bytes: &[u8]) -> Result<Vec<RawRecord>> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::list_from_json(value)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A normalized record: identifier, declared fields, and passthrough extras.
///
/// Produced by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: BTreeMap<String, FieldValue>,
    extra: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn from_parts(
        id: RecordId,
        fields: BTreeMap<String, FieldValue>,
        extra: Map<String, Value>,
    ) -> Self {
        Self { id, fields, extra }
    }

    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Declared field value, `Null` when the field is unknown
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL_VALUE)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// String form of any column: `id`, a declared field, or a passthrough field
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        if field == "id" {
            return Cow::Borrowed(self.id.as_str());
        }
        if let Some(value) = self.fields.get(field) {
            return match value {
                FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
                other => Cow::Owned(other.to_string()),
            };
        }
        match self.extra.get(field) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Null) | None => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extras = self
            .extra
            .iter()
            .filter(|(k, _)| k.as_str() != "id" && !self.fields.contains_key(k.as_str()));
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        for (key, value) in extras {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(FieldValue::Number(300.0).to_string(), "300");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.5");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_date_display() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let afternoon = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        assert_eq!(FieldValue::Date(midnight).to_string(), "2024-03-01");
        assert_eq!(
            FieldValue::Date(afternoon).to_string(),
            "2024-03-01T14:30:05Z"
        );
    }

    #[test]
    fn test_nan_is_not_a_number() {
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Number(2.0).as_number(), Some(2.0));
    }

    #[test]
    fn test_list_from_bare_array_drops_non_objects() {
        let records = RawRecord::list_from_json(json!([{"id": 1}, 42, {"id": 2}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("id"), Some(&json!(2)));
    }

    #[test]
    fn test_list_from_envelope() {
        let records =
            RawRecord::list_from_json(json!({"success": true, "data": [{"id": "a"}]})).unwrap();
        assert_eq!(records.len(), 1);

        let records = RawRecord::list_from_json(json!({"results": []})).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_list_rejects_scalars_and_bare_objects() {
        assert!(matches!(
            RawRecord::list_from_json(json!("nope")),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            RawRecord::list_from_json(json!({"message": "unauthorized"})),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_record_text_covers_id_fields_and_extras() {
        let mut extra = Map::new();
        extra.insert("photo".to_string(), json!("a.jpg"));
        extra.insert("verified".to_string(), json!(true));
        let record = Record::from_parts(
            RecordId::new("s-1"),
            BTreeMap::from([("quantity".to_string(), FieldValue::Number(40.0))]),
            extra,
        );

        assert_eq!(record.text("id"), "s-1");
        assert_eq!(record.text("quantity"), "40");
        assert_eq!(record.text("photo"), "a.jpg");
        assert_eq!(record.text("verified"), "true");
        assert_eq!(record.text("missing"), "");
        assert!(record.get("missing").is_null());
    }

    #[test]
    fn test_record_serializes_flat() {
        let mut extra = Map::new();
        extra.insert("remarks".to_string(), json!("ok"));
        let record = Record::from_parts(
            RecordId::new("t-9"),
            BTreeMap::from([
                ("total_price".to_string(), FieldValue::Number(100.0)),
                ("buyer".to_string(), FieldValue::Null),
            ]),
            extra,
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"id": "t-9", "buyer": null, "total_price": 100.0, "remarks": "ok"})
        );
    }
}
