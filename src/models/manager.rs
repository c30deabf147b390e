//! Manager invitation codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Time-boxed code a manager hands out so an employee can sign up under them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerCode {
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manager_email: String,
}

impl ManagerCode {
    /// Parsed expiry, if the gateway sent an RFC 3339 timestamp.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Whether the code has expired at `now`. Unparsable expiries never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry().is_some_and(|expiry| expiry <= now)
    }
}

/// Success payload of `POST /becamemanager`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BecomeManagerResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub new_role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_email: String,
}
