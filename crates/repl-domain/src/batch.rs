//! `Batch`: a slice of rows handed from the Transformer to the Loader.

use crate::Row;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub rows: Vec<Row>,
}

impl Batch {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Union of column names present in any row of the batch, in a stable
    /// (alphabetical) order so generated SQL is deterministic.
    pub fn union_columns(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for row in &self.rows {
            for key in row.keys() {
                set.insert(key.to_string());
            }
        }
        set.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
