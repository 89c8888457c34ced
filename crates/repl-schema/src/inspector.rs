use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use repl_domain::{ColumnMeta, EnumCatalog, ForeignKeyEdge, ReplicationError};
use repl_infra::ConnectionProvider;

use crate::queries;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MemoKey {
    Tables,
    Enums,
    Columns(String),
    ForeignKeys(String),
    PrimaryKey(String),
}

/// A single empty result is cached the same as a populated one — a query
/// that legitimately returns nothing (e.g. a table with no FKs) must not
/// be re-queried every call.
enum Cached {
    Tables(Vec<String>),
    Enums(EnumCatalog),
    Columns(Vec<ColumnMeta>),
    ForeignKeys(Vec<ForeignKeyEdge>),
    PrimaryKey(Vec<String>),
}

/// Owned by the Executor, borrowed by the Planner/Transformer. Caches
/// every query result for the lifetime of the run; invalidated only by
/// dropping and recreating the inspector.
pub struct SchemaInspector {
    provider: Arc<dyn ConnectionProvider>,
    cache: HashMap<MemoKey, Cached>,
}

impl SchemaInspector {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider, cache: HashMap::new() }
    }

    /// Every base table in the `public` schema.
    pub fn table_list(&mut self) -> Result<Vec<String>, ReplicationError> {
        if let Some(Cached::Tables(v)) = self.cache.get(&MemoKey::Tables) {
            return Ok(v.clone());
        }
        let mut conn = self.connection()?;
        let result = queries::query_table_list(&mut conn).unwrap_or_else(|e| {
            warn!("table_list query failed, yielding empty result: {e}");
            Vec::new()
        });
        self.cache.insert(MemoKey::Tables, Cached::Tables(result.clone()));
        Ok(result)
    }

    /// Declared-order column metadata for `table`.
    pub fn table_columns(&mut self, table: &str) -> Result<Vec<ColumnMeta>, ReplicationError> {
        let key = MemoKey::Columns(table.to_string());
        if let Some(Cached::Columns(v)) = self.cache.get(&key) {
            return Ok(v.clone());
        }
        let mut conn = self.connection()?;
        let result = queries::query_table_columns(&mut conn, table).unwrap_or_else(|e| {
            warn!("table_columns({table}) query failed, yielding empty result: {e}");
            Vec::new()
        });
        self.cache.insert(key, Cached::Columns(result.clone()));
        Ok(result)
    }

    /// Foreign-key edges where `table` is the dependent side.
    pub fn foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyEdge>, ReplicationError> {
        let key = MemoKey::ForeignKeys(table.to_string());
        if let Some(Cached::ForeignKeys(v)) = self.cache.get(&key) {
            return Ok(v.clone());
        }
        let mut conn = self.connection()?;
        let result = queries::query_foreign_keys(&mut conn, table).unwrap_or_else(|e| {
            warn!("foreign_keys({table}) query failed, yielding empty result: {e}");
            Vec::new()
        });
        self.cache.insert(key, Cached::ForeignKeys(result.clone()));
        Ok(result)
    }

    /// Ordered primary-key column names for `table`, used by the Loader to
    /// choose an `ON CONFLICT` target under the `update` policy.
    pub fn primary_key_columns(&mut self, table: &str) -> Result<Vec<String>, ReplicationError> {
        let key = MemoKey::PrimaryKey(table.to_string());
        if let Some(Cached::PrimaryKey(v)) = self.cache.get(&key) {
            return Ok(v.clone());
        }
        let mut conn = self.connection()?;
        let result = queries::query_primary_key_columns(&mut conn, table).unwrap_or_else(|e| {
            warn!("primary_key_columns({table}) query failed, yielding empty result: {e}");
            Vec::new()
        });
        self.cache.insert(key, Cached::PrimaryKey(result.clone()));
        Ok(result)
    }

    /// Enum-name -> ordered label list, for every user-defined enum in the
    /// `public` schema.
    pub fn enum_catalog(&mut self) -> Result<EnumCatalog, ReplicationError> {
        if let Some(Cached::Enums(v)) = self.cache.get(&MemoKey::Enums) {
            return Ok(v.clone());
        }
        let mut conn = self.connection()?;
        let result = queries::query_enum_catalog(&mut conn).unwrap_or_else(|e| {
            warn!("enum_catalog query failed, yielding empty catalog: {e}");
            EnumCatalog::new()
        });
        self.cache.insert(MemoKey::Enums, Cached::Enums(result.clone()));
        Ok(result)
    }

    /// Only this layer raises `schema-inspection-failed` — when the pool
    /// itself cannot hand back a connection, per §4.3.
    fn connection(&self) -> Result<repl_infra::PooledConnection, ReplicationError> {
        self.provider.connection().map_err(|e| ReplicationError::schema_inspection_failed(e.detail))
    }
}
