//! repl-domain: shared value types for the replication engine.
//!
//! Every other crate in the workspace builds on these types instead of
//! inventing its own row/column/error representation. Nothing here talks to
//! the network or a database; it is pure data plus the error taxonomy of
//! §7.

pub mod batch;
pub mod column;
pub mod enum_catalog;
pub mod error;
pub mod fk;
pub mod row;
pub mod stats;
pub mod table;
pub mod value;

pub use batch::Batch;
pub use column::{ColumnMeta, TypeFamily};
pub use enum_catalog::EnumCatalog;
pub use error::{ErrorKind, ReplicationError};
pub use fk::ForeignKeyEdge;
pub use row::Row;
pub use stats::{FailedTable, RunStats};
pub use table::{FieldDescriptor, TableDescriptor};
pub use value::Value;
