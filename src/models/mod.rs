//! Data models exchanged with the portal gateway.
//!
//! Field names match the gateway's JSON exactly. Records are transient
//! copies; the gateway owns every entity.

mod activity;
mod file;
mod manager;
mod meeting;
mod team;
mod user;

pub use activity::*;
pub use file::*;
pub use manager::*;
pub use meeting::*;
pub use team::*;
pub use user::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string or a number; anything else reads as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
