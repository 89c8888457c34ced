//! Maps a domain [`Value`] onto the `postgres` parameter type its target
//! column family expects. Binding by declared family (rather than by the
//! value's own tag) is what makes `accepts()` agree with the column type
//! the prepared statement infers — a stray mismatch here would surface as
//! a misleading "wrong type" error instead of the coercion failure it
//! actually is.

use chrono::{DateTime, Utc};
use postgres::types::ToSql;
use repl_domain::{TypeFamily, Value};

pub fn bind(value: &Value, family: TypeFamily) -> Box<dyn ToSql + Sync> {
    match family {
        TypeFamily::Integer => Box::new(as_i64(value)),
        TypeFamily::Numeric => Box::new(as_f64(value)),
        TypeFamily::Boolean => Box::new(as_bool(value)),
        TypeFamily::Temporal => Box::new(as_temporal(value)),
        TypeFamily::Json => Box::new(as_json(value)),
        TypeFamily::Text | TypeFamily::Enum | TypeFamily::Other => Box::new(as_text(value)),
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) => Some(*f as i64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

fn as_temporal(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Temporal(t) => Some(*t),
        _ => None,
    }
}

fn as_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Json(s) => serde_json::from_str(s).ok().or_else(|| Some(serde_json::Value::String(s.clone()))),
        Value::Null => None,
        other => Some(serde_json::Value::String(other.to_string())),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
