//! Learning-resource file endpoints.

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use super::require;
use crate::auth::keys;
use crate::errors::{ClientError, Result};
use crate::gateway::{envelope, Gateway};
use crate::models::{FileInfo, FileListing, UploadResponse, UNKNOWN_UPLOADER};

/// Error for a 2xx payload whose `success` flag is false.
fn unsuccessful(body: &Value, context: &str) -> ClientError {
    let message = envelope::string_field(body, "error")
        .or_else(|| envelope::string_field(body, "message"))
        .unwrap_or_else(|| format!("{}: request was not successful", context));
    tracing::error!("{}: {}", context, message);
    ClientError::Validation(message)
}

/// Download URL for `filename`.
pub fn file_url(gateway: &Gateway, filename: &str) -> String {
    gateway.url(&gateway.segment_path(&["files", filename]))
}

/// POST /files/upload - Upload a file as multipart field `file`.
///
/// Envelope: bare `{success, filename, user_email}`. The returned size is the
/// uploaded length; the uploader falls back to the session e-mail.
pub async fn upload_file(gateway: &Gateway, filename: &str, contents: Vec<u8>) -> Result<FileInfo> {
    require(&[("File name", filename)])?;

    let size = contents.len() as u64;
    let form = Form::new().part("file", Part::bytes(contents).file_name(filename.to_string()));
    let http = gateway.request_raw(Method::POST, "/files/upload").multipart(form);
    let body = gateway.send(http, "Failed to upload file").await?;

    let response: UploadResponse = envelope::decode(&body)?;
    if !response.success {
        return Err(unsuccessful(&body, "Failed to upload file"));
    }

    let stored_name = response
        .filename
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| filename.to_string());
    let uploaded_by = response
        .user_email
        .filter(|e| !e.is_empty())
        .or_else(|| gateway.session().get(keys::USER_EMAIL).filter(|e| !e.is_empty()))
        .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string());

    tracing::info!(filename = %stored_name, size, "File uploaded");
    Ok(FileInfo {
        url: Some(file_url(gateway, &stored_name)),
        filename: stored_name,
        size: Some(size),
        uploaded_at: Utc::now(),
        uploaded_by,
        file_id: None,
    })
}

/// GET /files - List shared files.
///
/// Envelope: `{success, files: [name]}`. Sizes and uploaders are unknown.
pub async fn list_files(gateway: &Gateway) -> Result<Vec<FileInfo>> {
    let body = gateway.get("/files", &[], "Failed to fetch files").await?;

    let listing: FileListing = envelope::decode(&body)?;
    if !listing.success {
        return Err(unsuccessful(&body, "Failed to fetch files"));
    }

    Ok(listing
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|name| {
            let url = file_url(gateway, &name);
            FileInfo::listed(name, url)
        })
        .collect())
}

/// GET /files/:filename - Download a file's contents.
pub async fn download_file(gateway: &Gateway, filename: &str) -> Result<Vec<u8>> {
    require(&[("File name", filename)])?;

    let http = gateway.request_raw(Method::GET, &gateway.segment_path(&["files", filename]));
    gateway.send_for_bytes(http, "Failed to download file").await
}
