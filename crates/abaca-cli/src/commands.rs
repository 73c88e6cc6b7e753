use super::args::{Cli, Commands, LogLevel};
use super::handlers;
use abaca_runtime::Config;
use abaca_runtime::config::expand_tilde;
use anyhow::Result;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let config_path = match &cli.config {
        Some(path) => expand_tilde(path),
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    // One command per process and one fetch at a time
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::View {
            entity,
            source,
            view,
        } => runtime.block_on(handlers::view::handle(
            &config, entity, &source, &view, cli.format,
        )),

        Commands::Export {
            entity,
            source,
            view,
            export_format,
            output,
        } => runtime.block_on(handlers::export::handle(
            &config,
            entity,
            &source,
            &view,
            export_format,
            output,
        )),

        Commands::SetStatus {
            entity,
            id,
            status,
            api,
        } => runtime.block_on(handlers::status::handle(
            &config, entity, &id, &status, api, cli.format,
        )),

        Commands::Entities => handlers::entities::handle(&config, cli.format),
    }
}

/// Logs go to stderr so stdout stays clean for tables, JSON and exports.
/// `RUST_LOG` overrides `--log-level`.
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
