use super::enums::ExportFormat;
use abaca_types::{EntityKind, SortSpec};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show one page of an entity list with its summary stats")]
    View {
        entity: EntityKind,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    #[command(about = "Export the filtered list (all pages) as CSV or JSON")]
    Export {
        entity: EntityKind,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, value_enum, default_value = "csv")]
        export_format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    #[command(about = "Change the status of one record, then show the refreshed list")]
    SetStatus {
        entity: EntityKind,
        id: String,
        status: String,

        /// Backend base URL (defaults to [api].base_url)
        #[arg(long)]
        api: Option<String>,
    },

    #[command(about = "List entities with their filters, sort and page sizes")]
    Entities,
}

/// Where the list comes from
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// JSON file, or directory holding <endpoint>.json files
    #[arg(long, conflicts_with = "api")]
    pub file: Option<PathBuf>,

    /// Backend base URL (defaults to [api].base_url)
    #[arg(long)]
    pub api: Option<String>,

    /// Server-side query parameter, e.g. --query year=2024
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,
}

/// Client-side view state
#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Case-insensitive text search over the searchable fields
    #[arg(long)]
    pub search: Option<String>,

    /// Categorical filter, e.g. --filter status=planted
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Earliest date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Sort column and direction, e.g. --sort total_price:desc
    #[arg(long, value_name = "FIELD[:asc|desc]")]
    pub sort: Option<SortSpec>,

    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
