use super::Style;
use super::formatters::{format_stat, humanize, truncate};
use super::view_models::ListViewModel;
use abaca_engine::ratio;
use abaca_types::{FieldValue, Record};
use std::fmt;

const MAX_CELL: usize = 28;
const BAR_WIDTH: usize = 12;
const COLUMN_GAP: &str = "  ";

pub struct ListView<'a> {
    data: &'a ListViewModel,
    style: Style,
}

impl<'a> ListView<'a> {
    pub fn new(data: &'a ListViewModel, style: Style) -> Self {
        Self { data, style }
    }

    pub fn for_stdout(data: &'a ListViewModel) -> Self {
        Self::new(data, Style::for_stdout())
    }

    fn write_stats(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats: Vec<String> = self
            .data
            .aggregates
            .iter()
            .map(|(name, value)| {
                format!(
                    "{} {}",
                    self.style.dim(&format!("{}:", humanize(name))),
                    self.style.bold(&format_stat(value))
                )
            })
            .collect();
        if !stats.is_empty() {
            writeln!(f, "{}", stats.join("   "))?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.data.columns;
        let rows: Vec<Vec<String>> = self
            .data
            .items
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| truncate(&record.text(&c.field), MAX_CELL))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = columns
            .iter()
            .map(|c| truncate(&c.header, MAX_CELL).chars().count())
            .collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let bar_width = if self.data.bar.is_some() {
            BAR_WIDTH + COLUMN_GAP.len()
        } else {
            0
        };
        let visible = visible_columns(&widths, self.style.width, bar_width);

        let header: Vec<String> = columns[..visible]
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(&truncate(&c.header, MAX_CELL), *w, false))
            .collect();
        writeln!(f, "{}", self.style.header(header.join(COLUMN_GAP).trim_end()))?;

        for (record, row) in self.data.items.iter().zip(&rows) {
            let cells: Vec<String> = row[..visible]
                .iter()
                .zip(&widths)
                .zip(columns)
                .map(|((cell, w), c)| pad(cell, *w, is_numeric(record, &c.field)))
                .collect();
            let mut line = cells.join(COLUMN_GAP);

            if let Some(bar) = &self.data.bar {
                let value = record.get(&bar.field).as_number().unwrap_or(0.0);
                let filled = (ratio(value, bar.max) * BAR_WIDTH as f64).round() as usize;
                line.push_str(COLUMN_GAP);
                line.push_str(&self.style.bar(&"█".repeat(filled)));
            }
            writeln!(f, "{}", line.trim_end())?;
        }

        if visible < columns.len() {
            let hidden: Vec<&str> = columns[visible..].iter().map(|c| c.header.as_str()).collect();
            writeln!(
                f,
                "{}",
                self.style
                    .dim(&format!("({} hidden: {})", hidden.len(), hidden.join(", ")))
            )?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for ListView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_stats(f)?;

        if self.data.items.is_empty() {
            let message = self
                .data
                .notice
                .map(|n| n.message())
                .unwrap_or("No records found.");
            writeln!(f, "{}", self.style.warn(message))?;
        } else {
            self.write_table(f)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{}",
            self.style.dim(&format!(
                "Page {} of {} ({} records)",
                self.data.page, self.data.page_count, self.data.total_count
            ))
        )
    }
}

/// How many leading columns fit in `width`; always at least one
fn visible_columns(widths: &[usize], width: Option<usize>, reserved: usize) -> usize {
    let Some(limit) = width else {
        return widths.len();
    };

    let mut used = reserved;
    let mut count = 0;
    for w in widths {
        let needed = if count == 0 { *w } else { w + COLUMN_GAP.len() };
        if count > 0 && used + needed > limit {
            break;
        }
        used += needed;
        count += 1;
    }
    count.max(1).min(widths.len())
}

fn is_numeric(record: &Record, field: &str) -> bool {
    matches!(record.get(field), FieldValue::Number(_))
}

fn pad(cell: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", cell, width = width)
    } else {
        format!("{:<width$}", cell, width = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::BarScale;
    use abaca_types::{Aggregates, ColumnSpec, EntityKind};

    fn model(items: Vec<Record>) -> ListViewModel {
        let mut aggregates = Aggregates::new();
        aggregates.insert("total_revenue", 400.0);
        aggregates.insert("max_total", 300.0);
        ListViewModel {
            entity: EntityKind::Transactions,
            notice: None,
            total_count: items.len(),
            page: 1,
            page_count: 1,
            page_size: 10,
            aggregates,
            items,
            columns: vec![
                ColumnSpec::new("id", "ID"),
                ColumnSpec::new("buyer_name", "Buyer"),
                ColumnSpec::new("total_price", "Total"),
            ],
            bar: Some(BarScale {
                field: "total_price".to_string(),
                max: 300.0,
            }),
        }
    }

    #[test]
    fn test_plain_table_with_bars() {
        let items = vec![
            Record::new("1")
                .with("buyer_name", FieldValue::text("Abaca Cordage Co."))
                .with("total_price", FieldValue::Number(300.0)),
            Record::new("2")
                .with("buyer_name", FieldValue::text("Bicol Fiber Traders"))
                .with("total_price", FieldValue::Number(100.0)),
        ];
        let data = model(items);
        let out = ListView::new(&data, Style::plain()).to_string();

        insta::assert_snapshot!(out.trim_end(), @r"
        Max total: 300   Total revenue: 400

        ID  Buyer                Total
        1   Abaca Cordage Co.      300  ████████████
        2   Bicol Fiber Traders    100  ████

        Page 1 of 1 (2 records)
        ");
    }

    #[test]
    fn test_empty_page_shows_notice() {
        let data = model(Vec::new());
        let out = ListView::new(&data, Style::plain()).to_string();
        assert!(out.contains("No records found."));
        assert!(out.contains("Page 1 of 1 (0 records)"));
    }

    #[test]
    fn test_visible_columns() {
        assert_eq!(visible_columns(&[5, 10, 10], None, 0), 3);
        assert_eq!(visible_columns(&[5, 10, 10], Some(18), 0), 2);
        assert_eq!(visible_columns(&[50, 10], Some(20), 0), 1);
    }
}
