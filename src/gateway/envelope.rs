//! Response envelope decoding.
//!
//! Gateway endpoints wrap their payloads inconsistently (`data`, the resource
//! name, or nothing). Each controller states its envelope explicitly through
//! these helpers rather than guessing.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ClientError, Result};

/// First key in `keys` whose value is present and not null.
pub fn pick<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|value| !value.is_null())
}

/// Decode a whole value into `T`.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| {
        tracing::error!("Unexpected payload shape: {}", e);
        ClientError::Decode(format!("Unexpected response shape: {}", e))
    })
}

/// Decode the required field `key`.
pub fn field<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T> {
    match pick(body, &[key]) {
        Some(value) => decode(value),
        None => Err(ClientError::Decode(format!(
            "Response is missing the `{}` field",
            key
        ))),
    }
}

/// Decode the first present key in `keys`, or `T::default()` when none is.
pub fn first_or_default<T: DeserializeOwned + Default>(body: &Value, keys: &[&str]) -> Result<T> {
    match pick(body, keys) {
        Some(value) => decode(value),
        None => Ok(T::default()),
    }
}

/// Decode the field `key`, or `T::default()` when absent.
pub fn field_or_default<T: DeserializeOwned + Default>(body: &Value, key: &str) -> Result<T> {
    first_or_default(body, &[key])
}

/// Decode the field `key` if present, else the whole body.
pub fn field_or_bare<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T> {
    decode(pick(body, &[key]).unwrap_or(body))
}

/// Non-empty string field.
pub fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
