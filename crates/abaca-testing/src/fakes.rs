//! In-memory collaborators for controller tests.

use abaca_runtime::{Error, ListFetcher, Mutation, QueryParams, RecordMutator, Result};
use abaca_types::{EntityKind, RawRecord};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Serves one shared list for every entity. Clones share the list, so a
/// `RecordingMutator` built from it sees and changes the same data.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    list: Arc<Mutex<Vec<Value>>>,
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<QueryParams>>>,
}

impl StaticFetcher {
    pub fn new(list: Vec<Value>) -> Self {
        Self {
            list: Arc::new(Mutex::new(list)),
            ..Self::default()
        }
    }

    pub fn replace(&self, list: Vec<Value>) {
        *lock(&self.list) = list;
    }

    pub fn list(&self) -> Vec<Value> {
        lock(&self.list).clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Query parameters of every fetch so far, oldest first
    pub fn queries(&self) -> Vec<QueryParams> {
        lock(&self.queries).clone()
    }
}

impl ListFetcher for StaticFetcher {
    async fn fetch_list(&self, _entity: EntityKind, query: &QueryParams) -> Result<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.queries).push(query.clone());
        Ok(self
            .list()
            .into_iter()
            .filter_map(RawRecord::from_value)
            .collect())
    }
}

/// Every fetch fails with the given HTTP status
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    status: u16,
}

impl FailingFetcher {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl Default for FailingFetcher {
    fn default() -> Self {
        Self::new(500)
    }
}

impl ListFetcher for FailingFetcher {
    async fn fetch_list(&self, _entity: EntityKind, _query: &QueryParams) -> Result<Vec<RawRecord>> {
        Err(Error::Status {
            status: self.status,
            body: "Internal Server Error".to_string(),
        })
    }
}

/// Records every mutation. When attached to a `StaticFetcher` it also
/// applies them to the served list.
#[derive(Debug, Default)]
pub struct RecordingMutator {
    applied: Mutex<Vec<(EntityKind, Mutation)>>,
    store: Option<StaticFetcher>,
    fail: bool,
}

impl RecordingMutator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backed_by(store: &StaticFetcher) -> Self {
        Self {
            store: Some(store.clone()),
            ..Self::default()
        }
    }

    /// A mutator whose backend rejects everything
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn applied(&self) -> Vec<(EntityKind, Mutation)> {
        lock(&self.applied).clone()
    }

    fn write_through(store: &StaticFetcher, mutation: &Mutation) {
        fn matches(item: &Value, id: &str) -> bool {
            match item.get("id") {
                Some(Value::String(s)) => s == id,
                Some(Value::Number(n)) => n.to_string() == id,
                _ => false,
            }
        }

        let mut list = lock(&store.list);

        match mutation {
            Mutation::Create { fields } => list.push(Value::Object(fields.clone())),
            Mutation::Update { id, fields } => {
                for item in list.iter_mut().filter(|item| matches(item, id.as_str())) {
                    if let Value::Object(map) = item {
                        for (key, value) in fields {
                            map.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            Mutation::Delete { id } => list.retain(|item| !matches(item, id.as_str())),
        }
    }
}

impl RecordMutator for RecordingMutator {
    async fn apply(&self, entity: EntityKind, mutation: &Mutation) -> Result<()> {
        if self.fail {
            return Err(Error::Status {
                status: 422,
                body: "Unprocessable Entity".to_string(),
            });
        }

        lock(&self.applied).push((entity, mutation.clone()));
        if let Some(store) = &self.store {
            Self::write_through(store, mutation);
        }
        Ok(())
    }
}
