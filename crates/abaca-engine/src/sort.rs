use abaca_types::{FieldValue, Record, SortDirection, SortSpec};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Comparable projection of a field value. Absent values have no key.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Date(DateTime<Utc>),
    Text(TextKey),
}

/// Collation key for text: letters compare without accents or case first
/// (`Ñoño` between `Nilo` and `Ortiz`), then by the lowercased original.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TextKey {
    base: String,
    folded: String,
}

impl TextKey {
    fn new(s: &str) -> Self {
        let folded = s.to_lowercase();
        let base = folded.nfd().filter(|c| !is_combining_mark(*c)).collect();
        Self { base, folded }
    }
}

impl SortKey {
    fn of(record: &Record, field: &str) -> Option<SortKey> {
        if field == "id" {
            let id = record.id().as_str();
            return Some(match id.parse::<f64>() {
                Ok(n) if n.is_finite() => SortKey::Number(n),
                _ => SortKey::Text(TextKey::new(id)),
            });
        }
        match record.get(field) {
            FieldValue::Null => None,
            FieldValue::Number(n) if n.is_finite() => Some(SortKey::Number(*n)),
            FieldValue::Number(_) => None,
            FieldValue::Date(d) => Some(SortKey::Date(*d)),
            // the normalizer's default for missing text counts as absent
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(SortKey::Text(TextKey::new(s))),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn cmp_ascending(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Absent keys sort last in both directions
fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp_ascending(b),
            SortDirection::Desc => a.cmp_ascending(b).reverse(),
        },
    }
}

/// Compare two records on one field.
///
/// Text compares case- and accent-insensitively, numbers numerically, dates
/// chronologically. Records missing the value go after every record that
/// has one, regardless of direction.
pub fn compare(a: &Record, b: &Record, field: &str, direction: SortDirection) -> Ordering {
    let left = SortKey::of(a, field);
    let right = SortKey::of(b, field);
    compare_keys(left.as_ref(), right.as_ref(), direction)
}

/// Stable sort: equal records keep their input order.
pub fn sort_records<'a>(records: &mut Vec<&'a Record>, sort: &SortSpec) {
    let mut keyed: Vec<(Option<SortKey>, &'a Record)> = records
        .iter()
        .map(|record| (SortKey::of(record, &sort.field), *record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), sort.direction));

    records.clear();
    records.extend(keyed.into_iter().map(|(_, record)| record));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn farmer(id: &str, name: &str) -> Record {
        Record::new(id).with("farmer_name", FieldValue::text(name))
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let a = farmer("1", "ana");
        let b = farmer("2", "Benito");
        assert_eq!(compare(&a, &b, "farmer_name", SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&a, &b, "farmer_name", SortDirection::Desc), Ordering::Greater);
        assert_eq!(
            compare(&farmer("3", "ANA"), &a, "farmer_name", SortDirection::Asc),
            Ordering::Equal
        );
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let names = ["Zaldy", "Ángel", "Ñoño", "Ortiz", "Benito"];
        let records: Vec<Record> = names.iter().map(|name| farmer(name, name)).collect();

        let mut sorted: Vec<&Record> = records.iter().collect();
        sort_records(&mut sorted, &SortSpec::asc("farmer_name"));
        assert_eq!(ids(&sorted), ["Ángel", "Benito", "Ñoño", "Ortiz", "Zaldy"]);

        let mut sorted: Vec<&Record> = records.iter().collect();
        sort_records(&mut sorted, &SortSpec::desc("farmer_name"));
        assert_eq!(ids(&sorted), ["Zaldy", "Ortiz", "Ñoño", "Benito", "Ángel"]);
    }

    #[test]
    fn test_accent_breaks_ties_after_base_letters() {
        let plain = farmer("plain", "Pena");
        let tilde = farmer("tilde", "Peña");
        let later = farmer("later", "Penaflor");
        assert_eq!(compare(&plain, &tilde, "farmer_name", SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&tilde, &later, "farmer_name", SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let small = Record::new("1").with("quantity", FieldValue::Number(9.0));
        let large = Record::new("2").with("quantity", FieldValue::Number(100.0));
        assert_eq!(compare(&small, &large, "quantity", SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let early = Record::new("1").with(
            "created_at",
            FieldValue::Date(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()),
        );
        let late = Record::new("2").with(
            "created_at",
            FieldValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        );
        assert_eq!(compare(&early, &late, "created_at", SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&early, &late, "created_at", SortDirection::Desc), Ordering::Greater);
    }

    #[test]
    fn test_missing_values_sort_last_both_ways() {
        let a = Record::new("a").with("price", FieldValue::Number(5.0));
        let missing = Record::new("m").with("price", FieldValue::Null);
        let b = Record::new("b").with("price", FieldValue::Number(7.0));

        let mut records = vec![&missing, &a, &b];
        sort_records(&mut records, &SortSpec::asc("price"));
        assert_eq!(ids(&records), ["a", "b", "m"]);

        let mut records = vec![&missing, &a, &b];
        sort_records(&mut records, &SortSpec::desc("price"));
        assert_eq!(ids(&records), ["b", "a", "m"]);
    }

    #[test]
    fn test_empty_text_counts_as_missing() {
        let blank = farmer("blank", "");
        let named = farmer("named", "Zaldy");
        let mut records = vec![&blank, &named];
        sort_records(&mut records, &SortSpec::asc("farmer_name"));
        assert_eq!(ids(&records), ["named", "blank"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let first = farmer("first", "Same");
        let other = farmer("other", "Another");
        let second = farmer("second", "same");

        let mut records = vec![&first, &other, &second];
        sort_records(&mut records, &SortSpec::asc("farmer_name"));
        assert_eq!(ids(&records), ["other", "first", "second"]);

        let mut records = vec![&first, &other, &second];
        sort_records(&mut records, &SortSpec::desc("farmer_name"));
        assert_eq!(ids(&records), ["first", "second", "other"]);
    }

    #[test]
    fn test_sort_by_id() {
        let b = Record::new("B-2");
        let a = Record::new("a-1");
        let mut records = vec![&b, &a];
        sort_records(&mut records, &SortSpec::asc("id"));
        assert_eq!(ids(&records), ["a-1", "B-2"]);

        let nine = Record::new("9");
        let ten = Record::new("10");
        let mut records = vec![&ten, &nine];
        sort_records(&mut records, &SortSpec::asc("id"));
        assert_eq!(ids(&records), ["9", "10"]);
    }

    #[test]
    fn test_mixed_kinds_order_numbers_dates_text() {
        let text = Record::new("t").with("value", FieldValue::text("x"));
        let number = Record::new("n").with("value", FieldValue::Number(1.0));
        let date = Record::new("d").with(
            "value",
            FieldValue::Date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        );
        let mut records = vec![&text, &date, &number];
        sort_records(&mut records, &SortSpec::asc("value"));
        assert_eq!(ids(&records), ["n", "d", "t"]);
    }
}
