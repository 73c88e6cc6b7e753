use abaca_types::{AggregateOp, AggregateSpec, Aggregates, Record};
use std::collections::HashSet;

/// Compute every aggregate over the filtered, unpaginated set.
pub fn aggregate(records: &[&Record], specs: &[AggregateSpec]) -> Aggregates {
    let mut aggregates = Aggregates::new();
    for spec in specs {
        aggregates.insert(&spec.name, compute(records, spec));
    }
    aggregates
}

fn compute(records: &[&Record], spec: &AggregateSpec) -> f64 {
    let subset: Vec<&Record> = match &spec.when {
        Some(condition) => records
            .iter()
            .copied()
            .filter(|r| r.text(&condition.field) == condition.equals.as_str())
            .collect(),
        None => records.to_vec(),
    };

    let field = spec.field.as_deref().unwrap_or("id");
    match spec.op {
        AggregateOp::Count => subset.len() as f64,
        AggregateOp::Sum => numbers(&subset, field).sum(),
        AggregateOp::Avg => {
            if subset.is_empty() {
                0.0
            } else {
                numbers(&subset, field).sum::<f64>() / subset.len() as f64
            }
        }
        AggregateOp::CountDistinct => subset
            .iter()
            .map(|r| r.text(field))
            .filter(|s| !s.trim().is_empty())
            .collect::<HashSet<_>>()
            .len() as f64,
        AggregateOp::Max => scale_max(numbers(&subset, field)),
    }
}

/// Numeric values; anything non-numeric counts as 0
fn numbers<'a>(records: &'a [&'a Record], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .map(move |r| r.get(field).as_number().unwrap_or(0.0))
}

/// Largest value for bar scaling; 1 when there is nothing positive to scale by
fn scale_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() && max > 0.0 { max } else { 1.0 }
}

/// Width fraction of a proportional bar, clamped to `[0, 1]`
pub fn ratio(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}
