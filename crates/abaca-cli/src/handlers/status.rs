use super::http_client;
use crate::args::OutputFormat;
use crate::presentation::{ListView, ListViewModel};
use abaca_runtime::{Config, Mutation, Notice, Phase, ViewController};
use abaca_types::EntityKind;
use anyhow::{Result, anyhow, bail};
use tracing::warn;

pub async fn handle(
    config: &Config,
    entity: EntityKind,
    id: &str,
    status: &str,
    api: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let view_config = config.view_config(entity);
    let allowed = view_config
        .filter_spec("status")
        .ok_or_else(|| anyhow!("{} records have no status", entity))?;
    if !allowed.values.iter().any(|v| v == status) {
        bail!(
            "'{}' is not a valid {} status (expected one of: {})",
            status,
            entity,
            allowed.values.join(", ")
        );
    }

    let client = http_client(config, api.as_deref())?;
    let mut controller = ViewController::new(entity, view_config);

    // The refetch after a successful update is the only source of new state
    let phase = controller
        .mutate(&client, &client, &Mutation::set_status(id, status))
        .await?;

    if phase == Phase::Error {
        warn!(%entity, id, "status updated but the list could not be refreshed");
        bail!(
            "status of {} {} set to '{}', but: {}",
            entity,
            id,
            status,
            Notice::LoadFailed.message()
        );
    }

    let model = ListViewModel::from_controller(&controller);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Plain => {
            println!("Set status of {} {} to '{}'\n", entity, id, status);
            print!("{}", ListView::for_stdout(&model));
        }
    }

    Ok(())
}
