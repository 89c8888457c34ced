//! Target connection pooling.
//!
//! Grounded on the teacher's `chem-persistence::pg::ConnectionProvider`
//! pattern: a trait in front of the pool so the Schema Inspector and
//! Loader can be exercised against a fake in unit tests without linking
//! r2d2 at all. Diesel's `r2d2::Pool<ConnectionManager<PgConnection>>`
//! becomes `r2d2::Pool<PostgresConnectionManager<NoTls>>` here — the
//! Diesel-specific piece (the `ConnectionManager`) is the only part that
//! changes; the pooling idiom is unchanged (see DESIGN.md).

use postgres::NoTls;
use r2d2_postgres::PostgresConnectionManager;
use repl_domain::ReplicationError;

pub type PgPool = r2d2::Pool<PostgresConnectionManager<NoTls>>;
pub type PooledConnection = r2d2::PooledConnection<PostgresConnectionManager<NoTls>>;

/// Abstracts "give me a usable connection" so callers don't couple
/// directly to r2d2.
pub trait ConnectionProvider: Send + Sync {
    fn connection(&self) -> Result<PooledConnection, ReplicationError>;
}

pub struct PoolProvider {
    pool: PgPool,
}

impl PoolProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool from a `postgres://` connection URL, validating the
    /// configuration at construction so failures surface immediately
    /// rather than on first use.
    pub fn connect(connection_url: &str, max_size: u32) -> Result<Self, ReplicationError> {
        let config: postgres::Config = connection_url
            .parse()
            .map_err(|e| ReplicationError::connect_failed(format!("invalid target connection string: {e}")))?;
        let manager = PostgresConnectionManager::new(config, NoTls);
        let pool = r2d2::Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| ReplicationError::connect_failed(format!("could not establish target pool: {e}")))?;
        Ok(Self { pool })
    }
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PooledConnection, ReplicationError> {
        self.pool
            .get()
            .map_err(|e| ReplicationError::connect_failed(format!("pool exhausted or broken: {e}")))
    }
}
