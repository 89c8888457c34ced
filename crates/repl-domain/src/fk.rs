//! Foreign-key edges among target tables, used by the Planner.

use serde::{Deserialize, Serialize};

/// `dependent` must be loaded after `referenced` and deleted before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub dependent: String,
    pub referenced: String,
}

impl ForeignKeyEdge {
    pub fn new(dependent: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self { dependent: dependent.into(), referenced: referenced.into() }
    }
}
