//! repl-policies — run-mode and conflict-resolution policy types, plus the
//! domain-agnostic synonym dictionary consulted by the Transformer's enum
//! cascade (`spec.md` §4.5 step 4).
//!
//! Kept as its own crate (mirroring the teacher's `chem-policies`) so the
//! dictionary can be shared by `repl-transform` and anything that wants to
//! validate it (e.g. a future `--explain-cascade` flag) without either
//! depending on the other.

use serde::{Deserialize, Serialize};

pub mod synonyms;

pub use synonyms::lookup_synonym;

/// How the Loader reacts to a unique-constraint conflict on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictPolicy {
    Error,
    Skip,
    Update,
}

impl ConflictPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Self::Error),
            "skip" => Some(Self::Skip),
            "update" => Some(Self::Update),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Error => "error",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Update => "update",
        }
    }
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self::Error
    }
}

/// Sync vs. dry-run, per `spec.md` §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    Sync,
    DryRun,
}

impl RunMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sync" => Some(Self::Sync),
            "dry-run" => Some(Self::DryRun),
            _ => None,
        }
    }
}

impl Default for RunMode {
    fn default() -> Self {
        Self::Sync
    }
}
