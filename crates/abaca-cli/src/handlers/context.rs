use crate::args::{SourceArgs, ViewArgs};
use abaca_runtime::{
    ApiConfig, Config, FileFetcher, HttpClient, ListFetcher, Notice, Phase, QueryParams,
    ViewController,
};
use abaca_types::{DateRange, EntityKind, FilterSelection, RawRecord};
use anyhow::{Result, bail};

/// The list source picked from `--file`, `--api` or `[api].base_url`
#[derive(Debug)]
pub enum DataSource {
    File(FileFetcher),
    Http(HttpClient),
}

impl DataSource {
    pub fn resolve(config: &Config, source: &SourceArgs) -> Result<Self> {
        if let Some(path) = &source.file {
            return Ok(DataSource::File(FileFetcher::new(path)));
        }
        Ok(DataSource::Http(http_client(config, source.api.as_deref())?))
    }
}

impl ListFetcher for DataSource {
    async fn fetch_list(
        &self,
        entity: EntityKind,
        query: &QueryParams,
    ) -> abaca_runtime::Result<Vec<RawRecord>> {
        match self {
            DataSource::File(fetcher) => fetcher.fetch_list(entity, query).await,
            DataSource::Http(client) => client.fetch_list(entity, query).await,
        }
    }
}

/// HTTP client for the backend; `api` overrides the configured base URL
pub fn http_client(config: &Config, api: Option<&str>) -> Result<HttpClient> {
    let api_config = ApiConfig {
        base_url: api.map(str::to_string).or_else(|| config.api.base_url.clone()),
        ..config.api.clone()
    };
    if api_config.base_url.is_none() {
        bail!("no data source: pass --file <PATH> or --api <URL>, or set [api].base_url in config.toml");
    }
    Ok(HttpClient::from_config(&api_config, config.auth())?)
}

/// Fetch the entity list and apply the requested view state
pub async fn load_view(
    config: &Config,
    entity: EntityKind,
    source: &SourceArgs,
    view: &ViewArgs,
) -> Result<ViewController> {
    let fetcher = DataSource::resolve(config, source)?;

    let mut controller = ViewController::new(entity, config.view_config(entity));
    let mut query = QueryParams::new();
    for (key, value) in &source.query {
        query.insert(key.as_str(), value.as_str());
    }
    controller.set_query(query);

    if controller.load(&fetcher).await == Phase::Error {
        bail!(
            "{} ({})",
            Notice::LoadFailed.message(),
            controller.last_error().unwrap_or("unknown error")
        );
    }

    apply_view_args(&mut controller, view)?;
    Ok(controller)
}

/// Apply view arguments in an order that leaves the requested page in place
pub fn apply_view_args(controller: &mut ViewController, args: &ViewArgs) -> Result<()> {
    if let Some(search) = &args.search {
        controller.set_search(search.as_str());
    }

    for (field, value) in &args.filters {
        controller.set_filter(field, FilterSelection::from(value.as_str()))?;
    }

    if args.from.is_some() || args.to.is_some() {
        if controller.config().date_field.is_none() {
            bail!("{} has no date column to filter on", controller.entity());
        }
        controller.set_date_range(DateRange::new(args.from, args.to)?);
    }

    if let Some(sort) = &args.sort {
        if sort.field != "id" && controller.config().field_spec(&sort.field).is_none() {
            bail!(
                "cannot sort {} by unknown field '{}'",
                controller.entity(),
                sort.field
            );
        }
        controller.set_sort(sort.clone());
    }

    if let Some(page_size) = args.page_size {
        controller.set_page_size(page_size);
    }
    controller.set_page(args.page);

    Ok(())
}
