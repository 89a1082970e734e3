//! Forgiving field deserializers
//!
//! Documents may have been written by other clients, so a scalar field can
//! arrive as a string, a number, a bool, or null. All of them are read as
//! text instead of failing the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(text_of)
}

/// Null and empty strings both mean "absent"
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = text_of(Value::deserialize(deserializer)?);
    Ok(if text.is_empty() { None } else { Some(text) })
}
