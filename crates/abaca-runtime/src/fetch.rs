use crate::{Error, Result};
use abaca_types::{EntityKind, RawRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Server-side filters known at fetch time (year, month, status, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Source of record lists. The engine never calls this itself; the view
/// controller does, and consumes only the resolved result.
pub trait ListFetcher {
    fn fetch_list(
        &self,
        entity: EntityKind,
        query: &QueryParams,
    ) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;
}

/// Reads lists from JSON files: `<dir>/<endpoint>.json`, or one fixed file.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_for(&self, entity: EntityKind) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(format!("{}.json", entity.endpoint()))
        } else {
            self.path.clone()
        }
    }
}

impl ListFetcher for FileFetcher {
    async fn fetch_list(&self, entity: EntityKind, query: &QueryParams) -> Result<Vec<RawRecord>> {
        let file = self.file_for(entity);
        if !query.is_empty() {
            debug!(file = %file.display(), "file source ignores server-side query parameters");
        }

        let bytes = tokio::fs::read(&file).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", file.display(), e),
            ))
        })?;
        let records = RawRecord::list_from_slice(&bytes)?;
        debug!(%entity, count = records.len(), file = %file.display(), "loaded records from file");
        Ok(records)
    }
}
