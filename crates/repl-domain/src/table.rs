//! Upstream-discovered table shape (§3 `TableDescriptor` / `FieldDescriptor`).

use serde::{Deserialize, Serialize};

/// One field of a [`TableDescriptor`] as reported by the Upstream API's
/// metadata endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// The upstream's own type tag (e.g. `"type/Text"`), kept verbatim —
    /// the Transformer coerces against the *target*'s declared type, not
    /// this one.
    pub base_type: String,
    /// Semantic role hint from upstream, e.g. `"type/PK"`. Not load-bearing
    /// for the replication algorithm itself; carried for diagnostics.
    pub semantic_type: Option<String>,
}

impl FieldDescriptor {
    pub fn is_primary_key(&self) -> bool {
        self.semantic_type.as_deref() == Some("type/PK")
    }
}

/// A table as discovered from the Upstream API. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub id: i64,
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl TableDescriptor {
    pub fn new(id: i64, name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self { id, name: name.into(), fields }
    }
}
