//! Error taxonomy shared across the workspace, per `spec.md` §7.
//!
//! Every fallible operation in the engine returns `Result<T, ReplicationError>`.
//! The only panics left in non-test code are programmer-error assertions
//! (e.g. a values/columns length mismatch while building a Loader
//! statement) — anything data-dependent goes through this type instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ConfigInvalid,
    AuthFailed,
    ConnectFailed,
    SchemaInspectionFailed,
    ExtractFailed,
    SchemaMismatch,
    InsertFailed,
    RowCountMismatch,
    SyncFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "config-invalid",
            ErrorKind::AuthFailed => "auth-failed",
            ErrorKind::ConnectFailed => "connect-failed",
            ErrorKind::SchemaInspectionFailed => "schema-inspection-failed",
            ErrorKind::ExtractFailed => "extract-failed",
            ErrorKind::SchemaMismatch => "schema-mismatch",
            ErrorKind::InsertFailed => "insert-failed",
            ErrorKind::RowCountMismatch => "row-count-mismatch",
            ErrorKind::SyncFailed => "sync-failed",
        }
    }
}

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[error("{kind}: {detail}", kind = kind.as_str())]
pub struct ReplicationError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ReplicationError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }

    pub fn config_invalid(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, detail)
    }

    pub fn auth_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthFailed, detail)
    }

    pub fn connect_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConnectFailed, detail)
    }

    pub fn schema_inspection_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaInspectionFailed, detail)
    }

    pub fn extract_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExtractFailed, detail)
    }

    pub fn schema_mismatch(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch, detail)
    }

    pub fn insert_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsertFailed, detail)
    }

    pub fn row_count_mismatch(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::RowCountMismatch, detail)
    }

    pub fn sync_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::SyncFailed, detail)
    }
}
