//! repl-schema — the Schema Inspector (`spec.md` §4.3).
//!
//! Queries the target's own catalogs for column metadata, enum label
//! sets, and foreign-key edges, with in-process memoization keyed by
//! `(tableName | "enums" | "tables")` exactly as §4.3 specifies — the
//! cache lives exactly as long as the owning `SchemaInspector` (one run).

mod inspector;
mod queries;

pub use inspector::SchemaInspector;
