use crate::Result;
use abaca_types::{EntityKind, RecordId};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;

/// A single-record change sent to the backend. A successful mutation is
/// always followed by a full refetch; records are never patched locally.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create { fields: Map<String, Value> },
    Update { id: RecordId, fields: Map<String, Value> },
    Delete { id: RecordId },
}

impl Mutation {
    /// Status transition: seedling planted, report approved/rejected, ...
    pub fn set_status(id: impl Into<RecordId>, status: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::String(status.into()));
        Mutation::Update {
            id: id.into(),
            fields,
        }
    }

    pub fn target(&self) -> Option<&RecordId> {
        match self {
            Mutation::Create { .. } => None,
            Mutation::Update { id, .. } | Mutation::Delete { id } => Some(id),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Mutation::Create { .. } => "create",
            Mutation::Update { .. } => "update",
            Mutation::Delete { .. } => "delete",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(id) => write!(f, "{} {}", self.verb(), id),
            None => f.write_str(self.verb()),
        }
    }
}

pub trait RecordMutator {
    fn apply(
        &self,
        entity: EntityKind,
        mutation: &Mutation,
    ) -> impl Future<Output = Result<()>> + Send;
}
