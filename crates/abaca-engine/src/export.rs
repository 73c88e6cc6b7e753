use abaca_types::{ColumnSpec, Record};
use serde_json::{Map, Value};
use std::io::Write;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

pub fn export<'a, I>(records: I, columns: &[ColumnSpec], format: ExportFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    match format {
        ExportFormat::Csv => export_csv(records, columns),
        ExportFormat::Json => export_json(records, columns),
    }
}

/// Header row plus one row per record; every value is quoted.
pub fn export_csv<'a, I>(records: I, columns: &[ColumnSpec]) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, records, columns)?;
    String::from_utf8(buf).map_err(|e| Error::Encoding(e.to_string()))
}

pub fn write_csv<'a, W, I>(writer: W, records: I, columns: &[ColumnSpec]) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(columns.iter().map(|c| c.header.as_str()))?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| record.text(&c.field).into_owned()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Array of objects keyed by column header, values as displayed
pub fn export_json<'a, I>(records: I, columns: &[ColumnSpec]) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let rows: Vec<Value> = records
        .into_iter()
        .map(|record| {
            let row: Map<String, Value> = columns
                .iter()
                .map(|c| (c.header.clone(), Value::String(record.text(&c.field).into_owned())))
                .collect();
            Value::Object(row)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
