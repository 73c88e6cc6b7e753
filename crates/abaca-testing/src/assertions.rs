//! Assertions over `abaca view --format json` output.

use anyhow::{Context, Result};
use serde_json::Value;

fn items(json: &Value) -> Result<&Vec<Value>> {
    json["items"]
        .as_array()
        .context("Expected 'items' array in JSON")
}

/// Assert the number of records matching the current filters
pub fn assert_total_count(json: &Value, expected: u64) -> Result<()> {
    let total = json["total_count"]
        .as_u64()
        .context("Expected 'total_count' in JSON")?;

    if total != expected {
        anyhow::bail!("Expected {} matching records, got {}", expected, total);
    }

    Ok(())
}

/// Assert the ids on the current page, in display order
pub fn assert_item_ids(json: &Value, expected: &[&str]) -> Result<()> {
    let ids: Vec<&str> = items(json)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item["id"]
                .as_str()
                .with_context(|| format!("Item {} missing id", i))
        })
        .collect::<Result<_>>()?;

    if ids != expected {
        anyhow::bail!("Expected ids {:?}, got {:?}", expected, ids);
    }

    Ok(())
}

/// Assert every item on the page has `field == value`
pub fn assert_all_items(json: &Value, field: &str, value: &str) -> Result<()> {
    for (i, item) in items(json)?.iter().enumerate() {
        let actual = item[field]
            .as_str()
            .with_context(|| format!("Item {} missing text field '{}'", i, field))?;
        if actual != value {
            anyhow::bail!("Item {} has {} = '{}', expected '{}'", i, field, actual, value);
        }
    }

    Ok(())
}

pub fn assert_aggregate(json: &Value, name: &str, expected: f64) -> Result<()> {
    let actual = json["aggregates"][name]
        .as_f64()
        .with_context(|| format!("Expected aggregate '{}' in JSON", name))?;

    if (actual - expected).abs() > 1e-9 {
        anyhow::bail!("Expected {} = {}, got {}", name, expected, actual);
    }

    Ok(())
}
