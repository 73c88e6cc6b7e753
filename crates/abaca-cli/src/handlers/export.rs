use super::load_view;
use crate::args::{ExportFormat, SourceArgs, ViewArgs};
use abaca_runtime::Config;
use abaca_types::EntityKind;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

pub async fn handle(
    config: &Config,
    entity: EntityKind,
    source: &SourceArgs,
    view: &ViewArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let controller = load_view(config, entity, source, view).await?;
    let exported = controller.export(format.into())?;
    let count = controller.result().total_count;

    match output {
        Some(path) => {
            std::fs::write(&path, &exported)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(%entity, count, path = %path.display(), "export written");
            println!("Exported {} {} to {}", count, entity, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(exported.as_bytes())?;
            if !exported.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}
