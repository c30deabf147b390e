//! Learning-resource file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Name used when the uploader is not known.
pub const UNKNOWN_UPLOADER: &str = "unknown";

/// A shared file.
///
/// The listing endpoint only returns names, so `size` is only known for files
/// uploaded by this client and `uploaded_at` is the client's clock at decode
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    /// Size in bytes, when known.
    #[serde(default)]
    pub size: Option<u64>,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileInfo {
    /// Entry for a name returned by the listing endpoint.
    pub fn listed(filename: String, url: String) -> Self {
        Self {
            filename,
            size: None,
            uploaded_at: Utc::now(),
            uploaded_by: UNKNOWN_UPLOADER.to_string(),
            file_id: None,
            url: Some(url),
        }
    }

    /// Size for display, e.g. `1.5 KB`.
    pub fn display_size(&self) -> String {
        match self.size {
            Some(bytes) => format_bytes(bytes),
            None => "unknown size".to_string(),
        }
    }
}

/// Success payload of `POST /files/upload`.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Success payload of `GET /files`.
#[derive(Debug, Deserialize)]
pub(crate) struct FileListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
