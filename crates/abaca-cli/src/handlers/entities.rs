use crate::args::OutputFormat;
use crate::presentation::Style;
use abaca_runtime::Config;
use abaca_types::EntityKind;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct EntitySummary {
    name: &'static str,
    endpoint: &'static str,
    default_sort: String,
    page_sizes: Vec<usize>,
    searchable: Vec<String>,
    filters: Vec<FilterSummary>,
    date_field: Option<String>,
    aggregates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FilterSummary {
    field: String,
    values: Vec<String>,
}

pub fn handle(config: &Config, format: OutputFormat) -> Result<()> {
    let summaries: Vec<EntitySummary> = EntityKind::ALL
        .into_iter()
        .map(|entity| {
            let view = config.view_config(entity);
            EntitySummary {
                name: entity.as_str(),
                endpoint: entity.endpoint(),
                default_sort: format!("{}:{}", view.default_sort.field, view.default_sort.direction),
                page_sizes: view.page_sizes.clone(),
                searchable: view.searchable.clone(),
                filters: view
                    .filters
                    .iter()
                    .map(|f| FilterSummary {
                        field: f.field.clone(),
                        values: f.values.clone(),
                    })
                    .collect(),
                date_field: view.date_field.clone(),
                aggregates: view.aggregates.iter().map(|a| a.name.clone()).collect(),
            }
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Plain => {
            let style = Style::for_stdout();
            for summary in &summaries {
                println!("{} (/{})", style.bold(summary.name), summary.endpoint);
                println!("  sort:     {}", summary.default_sort);
                println!(
                    "  pages:    {}",
                    summary
                        .page_sizes
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("  search:   {}", summary.searchable.join(", "));
                for filter in &summary.filters {
                    println!("  filter:   {} = {}", filter.field, filter.values.join(" | "));
                }
                if let Some(date_field) = &summary.date_field {
                    println!("  dates:    {}", date_field);
                }
                println!("  stats:    {}", summary.aggregates.join(", "));
                println!();
            }
        }
    }

    Ok(())
}
