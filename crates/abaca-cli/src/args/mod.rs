mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "abaca")]
#[command(about = "Browse abaca marketplace lists from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $ABACA_PATH/config.toml or the XDG config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}
