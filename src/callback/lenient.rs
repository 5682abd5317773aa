//! Permissive field decoding for callback payloads.
//!
//! Wrong-typed or `null` values decode to the field's zero value. A forged or
//! mangled field then simply fails signature verification.

use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => parse_flag(&s),
        _ => false,
    })
}

pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// `order` is an object with an `id` in webhooks, but a bare id is accepted too
pub(crate) fn order_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.get("id").map(number_from_value).unwrap_or_default(),
        other => number_from_value(&other),
    })
}

/// Nested objects; anything that is not a JSON object becomes `T::default()`
pub(crate) fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(T::default()),
    }
}

fn number_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .unwrap_or_default(),
        Value::String(s) => parse_number(s),
        _ => 0,
    }
}

/// Decimal text to `u64`, zero when it is not one
pub(crate) fn parse_number(text: &str) -> u64 {
    if text.is_empty() {
        return 0;
    }
    text.parse().unwrap_or_else(|_| {
        tracing::debug!(value = %text, "Callback field is not an unsigned integer");
        0
    })
}

/// Boolean text in the forms Accept and common form encoders produce
pub(crate) fn parse_flag(text: &str) -> bool {
    match text {
        "true" | "True" | "TRUE" | "t" | "T" | "1" => true,
        "false" | "False" | "FALSE" | "f" | "F" | "0" | "" => false,
        other => {
            tracing::debug!(value = %other, "Callback field is not a boolean");
            false
        }
    }
}
