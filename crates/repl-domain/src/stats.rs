//! `RunStats`: the Executor's single piece of mutable shared state (§5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ErrorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedTable {
    pub table: String,
    pub kind: ErrorKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_tables: usize,
    pub successful_tables: usize,
    pub failed_tables: Vec<FailedTable>,
    pub rows_planned: u64,
    pub rows_inserted: u64,
    pub enum_transformations: u64,
    pub default_substitutions: u64,
    pub null_substitutions: u64,
    pub coercion_failures: u64,
}

impl RunStats {
    pub fn start(total_tables: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            ended_at: None,
            total_tables,
            successful_tables: 0,
            failed_tables: Vec::new(),
            rows_planned: 0,
            rows_inserted: 0,
            enum_transformations: 0,
            default_substitutions: 0,
            null_substitutions: 0,
            coercion_failures: 0,
        }
    }

    pub fn record_success(&mut self, rows_planned: u64, rows_inserted: u64) {
        self.successful_tables += 1;
        self.rows_planned += rows_planned;
        self.rows_inserted += rows_inserted;
    }

    pub fn record_failure(&mut self, table: impl Into<String>, kind: ErrorKind, detail: impl Into<String>) {
        self.failed_tables.push(FailedTable { table: table.into(), kind, detail: detail.into() });
    }

    pub fn finish(&mut self, ended_at: DateTime<Utc>) {
        self.ended_at = Some(ended_at);
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_tables.is_empty()
    }
}
