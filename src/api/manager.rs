//! Manager invitation code endpoints.

use reqwest::Method;
use serde_json::json;

use super::require;
use crate::errors::Result;
use crate::gateway::{envelope, Gateway};
use crate::models::{BecomeManagerResponse, ManagerCode};

/// GET /getCodeForManager - Issue an invitation code for the signed-in manager.
///
/// Envelope: bare `{code, expires_at, manager_email}`.
pub async fn generate_manager_code(gateway: &Gateway) -> Result<ManagerCode> {
    let body = gateway
        .get("/getCodeForManager", &[], "Failed to generate code")
        .await?;
    envelope::decode(&body)
}

/// POST /becamemanager - Redeem a code to become a manager.
///
/// Envelope: bare `{success, message, new_role, user_email}`. A reported
/// `new_role` replaces the session role.
pub async fn become_manager(gateway: &Gateway, code: &str) -> Result<BecomeManagerResponse> {
    require(&[("Code", code)])?;

    let body = gateway
        .post(
            "/becamemanager",
            &json!({ "code": code }),
            "Failed to become manager",
        )
        .await?;
    let response: BecomeManagerResponse = envelope::decode(&body)?;

    if let Some(role) = response.new_role.as_deref().filter(|r| !r.is_empty()) {
        gateway.session().set_role(role);
        tracing::info!(role, "Session role updated");
    }

    Ok(response)
}

/// GET /generateBecameManagerCode - Issue a code for becoming a manager.
///
/// Sent without credentials. Envelope: `{code}`.
pub async fn generate_become_manager_code(gateway: &Gateway) -> Result<String> {
    let http = gateway.request_unauthenticated(Method::GET, "/generateBecameManagerCode");
    let body = gateway
        .send(http, "Failed to generate manager code")
        .await?;
    envelope::field(&body, "code")
}
