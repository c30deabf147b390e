//! Configuration module for the portal client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Gateway origin used when `PORTAL_GATEWAY_URL` is not set.
pub const DEFAULT_GATEWAY_URL: &str = "https://192.168.0.95:7050";

/// Output format for the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote gateway, without trailing slash
    pub gateway_url: String,
    /// File holding the persisted session between runs
    pub session_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Accept self-signed gateway certificates
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let gateway_url = env::var("PORTAL_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let session_path = env::var("PORTAL_SESSION_PATH")
            .unwrap_or_else(|_| "./data/session.json".to_string())
            .into();

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("PORTAL_LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::from_str(&s))
            .unwrap_or(LogFormat::Text);

        let accept_invalid_certs = env::var("PORTAL_ACCEPT_INVALID_CERTS")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            gateway_url,
            session_path,
            log_level,
            log_format,
            accept_invalid_certs,
        }
    }
}
