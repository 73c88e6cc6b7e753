use super::load_view;
use crate::args::{OutputFormat, SourceArgs, ViewArgs};
use crate::presentation::{ListView, ListViewModel};
use abaca_runtime::Config;
use abaca_types::EntityKind;
use anyhow::Result;

pub async fn handle(
    config: &Config,
    entity: EntityKind,
    source: &SourceArgs,
    view: &ViewArgs,
    format: OutputFormat,
) -> Result<()> {
    let controller = load_view(config, entity, source, view).await?;
    let model = ListViewModel::from_controller(&controller);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Plain => print!("{}", ListView::for_stdout(&model)),
    }

    Ok(())
}
