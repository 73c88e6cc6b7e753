//! REST collaborator for the marketplace backend.

use crate::auth::AuthContext;
use crate::config::ApiConfig;
use crate::fetch::{ListFetcher, QueryParams};
use crate::mutation::{Mutation, RecordMutator};
use crate::{Error, Result};
use abaca_types::{EntityKind, RawRecord};
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;
use tracing::{debug, info};

/// Longest error body kept in `Error::Status`
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, auth: AuthContext, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    pub fn from_config(config: &ApiConfig, auth: AuthContext) -> Result<Self> {
        let base_url = config.base_url.clone().ok_or_else(|| {
            Error::Config("no API base URL configured (set [api].base_url or pass --api)".to_string())
        })?;
        Self::new(base_url, auth, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// `{base}/{segments...}` with the query appended
    pub fn url(&self, segments: &[&str], query: &QueryParams) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, segments.join("/")))
            .map_err(|e| Error::Config(format!("invalid request URL: {}", e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.iter() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(Error::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl ListFetcher for HttpClient {
    async fn fetch_list(&self, entity: EntityKind, query: &QueryParams) -> Result<Vec<RawRecord>> {
        let url = self.url(&[entity.endpoint()], query)?;
        debug!(%entity, %url, "fetching list");

        let response = self.send(self.client.get(url)).await?;
        let bytes = response.bytes().await?;
        let records = RawRecord::list_from_slice(&bytes)?;

        debug!(%entity, count = records.len(), "fetched list");
        Ok(records)
    }
}

impl RecordMutator for HttpClient {
    async fn apply(&self, entity: EntityKind, mutation: &Mutation) -> Result<()> {
        let none = QueryParams::new();
        let request = match mutation {
            Mutation::Create { fields } => self
                .client
                .post(self.url(&[entity.endpoint()], &none)?)
                .json(fields),
            Mutation::Update { id, fields } => self
                .client
                .put(self.url(&[entity.endpoint(), id.as_str()], &none)?)
                .json(fields),
            Mutation::Delete { id } => self
                .client
                .delete(self.url(&[entity.endpoint(), id.as_str()], &none)?),
        };

        self.send(request).await?;
        info!(%entity, %mutation, role = ?self.auth.role(), "mutation accepted");
        Ok(())
    }
}
