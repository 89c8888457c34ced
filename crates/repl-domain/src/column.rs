//! Target-side column metadata (§3 `ColumnMeta`).

use serde::{Deserialize, Serialize};

/// Declared SQL type family for a target column, per `spec.md` §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFamily {
    Integer,
    Numeric,
    Boolean,
    Temporal,
    Text,
    Json,
    /// A user-defined enum; `enum_name` in [`ColumnMeta`] names it.
    Enum,
    /// Anything the inspector didn't recognize; treated like `Text` by the
    /// Transformer's "other -> convert to text" rule.
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub type_family: TypeFamily,
    /// Name of the user-defined enum type when `type_family == Enum`.
    pub enum_name: Option<String>,
    pub nullable: bool,
    pub has_default: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_family: TypeFamily, nullable: bool, has_default: bool) -> Self {
        Self { name: name.into(), type_family, enum_name: None, nullable, has_default }
    }

    pub fn with_enum_name(mut self, enum_name: impl Into<String>) -> Self {
        self.enum_name = Some(enum_name.into());
        self
    }
}
