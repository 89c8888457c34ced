//! `EnumCatalog`: mapping from enum type name to its ordered label set.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumCatalog {
    labels_by_enum: HashMap<String, Vec<String>>,
}

impl EnumCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(labels_by_enum: HashMap<String, Vec<String>>) -> Self {
        Self { labels_by_enum }
    }

    pub fn insert(&mut self, enum_name: impl Into<String>, labels: Vec<String>) {
        self.labels_by_enum.insert(enum_name.into(), labels);
    }

    /// Declared-order label list for `enum_name`, or `None` if the catalog
    /// has no entry for it (§3: "consulted only when ... the enum name
    /// appears in the catalog").
    pub fn labels(&self, enum_name: &str) -> Option<&[String]> {
        self.labels_by_enum.get(enum_name).map(|v| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.labels_by_enum.is_empty()
    }

    pub fn contains(&self, enum_name: &str) -> bool {
        self.labels_by_enum.contains_key(enum_name)
    }
}
