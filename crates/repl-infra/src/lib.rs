//! repl-infra — cross-cutting concerns the Executor owns but doesn't want
//! to reimplement inline: target connection pooling, retry/backoff, and
//! TTY progress rendering.

pub mod pool;
pub mod progress;
pub mod retry;

pub use pool::{ConnectionProvider, PgPool, PooledConnection, PoolProvider};
pub use retry::{retry_with_backoff, Backoff};
