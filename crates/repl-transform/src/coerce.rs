//! Type-family coercions outside enums, `spec.md` §4.5 paragraph 2.

use chrono::{DateTime, Utc};
use repl_domain::Value;

const TRUTHY: &[&str] = &["true", "1", "yes", "on", "t", "y"];
const FALSY: &[&str] = &["false", "0", "no", "off", "f", "n"];

/// Returns the coerced value and whether the coercion failed (the caller
/// increments a `coercion_failures` counter on `true`; a failure always
/// yields `Value::Null`, never a partially-coerced value).
pub fn to_integer(value: &Value) -> (Value, bool) {
    match value {
        Value::Int(i) => (Value::Int(*i), false),
        Value::Float(f) => (Value::Int(*f as i64), false),
        Value::Text(s) => match s.trim().parse::<i64>() {
            Ok(i) => (Value::Int(i), false),
            Err(_) => (Value::Null, true),
        },
        _ => (Value::Null, true),
    }
}

pub fn to_float(value: &Value) -> (Value, bool) {
    match value {
        Value::Float(f) => (Value::Float(*f), false),
        Value::Int(i) => (Value::Float(*i as f64), false),
        Value::Text(s) => match s.trim().parse::<f64>() {
            Ok(f) => (Value::Float(f), false),
            Err(_) => (Value::Null, true),
        },
        _ => (Value::Null, true),
    }
}

pub fn to_boolean(value: &Value) -> (Value, bool) {
    match value {
        Value::Bool(b) => (Value::Bool(*b), false),
        Value::Text(s) => {
            let folded = s.trim().to_lowercase();
            if TRUTHY.contains(&folded.as_str()) {
                (Value::Bool(true), false)
            } else if FALSY.contains(&folded.as_str()) {
                (Value::Bool(false), false)
            } else {
                (Value::Null, true)
            }
        }
        _ => (Value::Null, true),
    }
}

pub fn to_temporal(value: &Value) -> (Value, bool) {
    match value {
        Value::Temporal(t) => (Value::Temporal(*t), false),
        Value::Text(s) => match DateTime::parse_from_rfc3339(s.trim()) {
            Ok(t) => (Value::Temporal(t.with_timezone(&Utc)), false),
            Err(_) => (Value::Null, true),
        },
        _ => (Value::Null, true),
    }
}

/// Non-strings are serialized; a string already holding a JSON array or
/// object is passed through untouched (§4.5: "String values that parse
/// syntactically as a JSON array or object are passed through untouched").
pub fn to_json(value: &Value) -> (Value, bool) {
    match value {
        Value::Json(s) => (Value::Json(s.clone()), false),
        Value::Text(s) => {
            let trimmed = s.trim_start();
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                (Value::Json(s.clone()), false)
            } else {
                (Value::Json(serde_json::Value::String(s.clone()).to_string()), false)
            }
        }
        Value::Int(i) => (Value::Json(i.to_string()), false),
        Value::Float(f) => (Value::Json(f.to_string()), false),
        Value::Bool(b) => (Value::Json(b.to_string()), false),
        Value::Temporal(t) => (Value::Json(serde_json::Value::String(t.to_rfc3339()).to_string()), false),
        Value::Null => (Value::Null, false),
    }
}

pub fn to_text(value: &Value) -> (Value, bool) {
    match value {
        Value::Text(s) => (Value::Text(s.clone()), false),
        other => (Value::Text(other.to_string()), false),
    }
}
