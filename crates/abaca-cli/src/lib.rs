// Command-line front end: one process per command, one view controller per
// entity list. The engine and runtime crates do the work; this crate parses
// arguments, picks the data source and renders results.

mod args;
mod commands;
mod handlers;
pub mod presentation;

pub use args::{Cli, Commands, ExportFormat, LogLevel, OutputFormat, SourceArgs, ViewArgs};
pub use commands::run;
