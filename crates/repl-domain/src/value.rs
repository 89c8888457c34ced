//! Tagged value union exchanged between Upstream Client, Transformer and
//! Loader. See `spec.md` §9: a duck-typed row becomes a tagged value here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of a [`crate::Row`].
///
/// `Json` always holds an already-serialized JSON text representation —
/// the Transformer is the only place that constructs it (either by
/// canonicalizing an array/object, or by passing through a string that
/// already parses as JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Temporal(DateTime<Utc>),
    Json(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for an empty text value; used by coercion rules that normalize
    /// `""` to null.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Temporal(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Json(s) => write!(f, "{s}"),
        }
    }
}
