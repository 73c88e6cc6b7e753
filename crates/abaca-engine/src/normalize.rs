//! Record normalization: raw API objects → type-correct records.
//!
//! Every declared field ends up present. Missing or unusable values fall back
//! to the field's configured default, then to the type default (`0`, `""`,
//! or null for dates). Undeclared fields pass through untouched.

use abaca_types::{FieldKind, FieldSpec, FieldValue, RawRecord, Record, RecordId, ViewConfig};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn normalize_all(raws: &[RawRecord], config: &ViewConfig) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(raws.len());
    raws.iter()
        .enumerate()
        .map(|(position, raw)| {
            let record = normalize(raw, config, position);
            if !seen.insert(record.id().clone()) {
                warn!(id = %record.id(), "duplicate record id in fetched list");
            }
            record
        })
        .collect()
}

/// Normalize one raw record. `position` is its index in the fetched list and
/// only used to synthesize an identifier when the record has none.
pub fn normalize(raw: &RawRecord, config: &ViewConfig, position: usize) -> Record {
    let id = extract_id(raw, &config.id_field, position);

    let fields: BTreeMap<String, FieldValue> = config
        .fields
        .iter()
        .map(|spec| (spec.name.clone(), normalize_field(raw.get(&spec.name), spec, &id)))
        .collect();

    let extra: Map<String, Value> = raw
        .fields()
        .iter()
        .filter(|(key, _)| **key != config.id_field && !fields.contains_key(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Record::from_parts(id, fields, extra)
}

fn extract_id(raw: &RawRecord, id_field: &str, position: usize) -> RecordId {
    match raw.get(id_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => RecordId::new(s.trim()),
        Some(Value::Number(n)) => RecordId::new(n.to_string()),
        _ => {
            let synthesized = format!("#{}", position + 1);
            warn!(position, id_field, "record has no usable id, using {}", synthesized);
            RecordId::new(synthesized)
        }
    }
}

fn normalize_field(raw: Option<&Value>, spec: &FieldSpec, id: &RecordId) -> FieldValue {
    if let Some(value) = raw.filter(|v| !v.is_null()) {
        if let Some(coerced) = coerce(value, spec.kind) {
            return coerced;
        }
        debug!(record = %id, field = %spec.name, %value, "unusable value replaced by default");
    }

    spec.default
        .as_ref()
        .and_then(|default| coerce(default, spec.kind))
        .unwrap_or_else(|| type_default(spec.kind))
}

fn type_default(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(String::new()),
        FieldKind::Number => FieldValue::Number(0.0),
        FieldKind::Date => FieldValue::Null,
    }
}

/// Convert a JSON value to the requested kind, `None` if it cannot be
pub fn coerce(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            _ => None,
        },
        FieldKind::Number => match value {
            Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(FieldValue::Number),
            Value::String(s) => parse_number(s).map(FieldValue::Number),
            _ => None,
        },
        FieldKind::Date => match value {
            Value::String(s) => parse_date(s).map(FieldValue::Date),
            _ => None,
        },
    }
}

/// Numeric strings as sent by form inputs: surrounding spaces and thousands
/// separators are tolerated.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// RFC 3339 timestamps, naive timestamps (read as UTC), or plain dates
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
