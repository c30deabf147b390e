//! Error handling module for the portal client.
//!
//! Every failure a controller can report is a [`ClientError`] carrying a
//! human-readable message. The variant is derived from the HTTP status; the
//! message is taken from the gateway payload whenever it provides one.

use reqwest::StatusCode;
use serde_json::Value;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
}

/// Client error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Missing or rejected credentials (401, 403)
    Unauthorized(String),
    /// Rejected input, including client-side required-field checks (400 and other 4xx)
    Validation(String),
    /// Unknown resource (404)
    NotFound(String),
    /// State conflict such as a full activity (409)
    Conflict(String),
    /// Gateway failure (5xx)
    Server(String),
    /// The request never completed
    Network(String),
    /// Success status with a payload of unexpected shape
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Conflict(_) => codes::CONFLICT,
            ClientError::Server(_) => codes::SERVER_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Unauthorized(msg)
            | ClientError::Validation(msg)
            | ClientError::NotFound(msg)
            | ClientError::Conflict(msg)
            | ClientError::Server(msg)
            | ClientError::Network(msg)
            | ClientError::Decode(msg) => msg,
        }
    }

    /// Build the error for a non-2xx response.
    ///
    /// The message is the payload's `error` field, else its `message` field,
    /// else `"<context>: <status>"`. Endpoints name their error field
    /// inconsistently, so the order matters.
    pub fn from_response(status: StatusCode, body: &Value, context: &str) -> Self {
        let message = message_field(body, "error")
            .or_else(|| message_field(body, "message"))
            .unwrap_or_else(|| format!("{}: {}", context, status.as_u16()));

        Self::from_status(status, message)
    }

    /// Map a status code onto the error taxonomy.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            400..=499 => ClientError::Validation(message),
            _ => ClientError::Server(message),
        }
    }
}

/// Non-empty string value of `key`.
fn message_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Network error: {:?}", err);
        ClientError::Network(format!("Network error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("Malformed response: {}", err))
    }
}
