//! Team directory endpoints.

use crate::errors::Result;
use crate::gateway::{envelope, Gateway};
use crate::models::{Employees, TeamInfo, Teammates, UserIdentity};

/// GET /my-employees - Employees reporting to the signed-in manager.
///
/// Envelope: bare `{employees, manager, employees_count}` with `[]`, `null`
/// and `0` defaults.
pub async fn my_employees(gateway: &Gateway, include_details: bool) -> Result<Employees> {
    let body = gateway
        .get(
            "/my-employees",
            &[("include_details", include_details.to_string())],
            "Failed to fetch employees",
        )
        .await?;
    envelope::decode(&body)
}

/// GET /teammates - Peers of the signed-in employee.
///
/// Envelope: bare `{teammates, manager, teammates_count, employee?}` with
/// `[]`, `null` and `0` defaults.
pub async fn teammates_for_display(
    gateway: &Gateway,
    include_details: bool,
    include_manager: bool,
) -> Result<Teammates> {
    let body = gateway
        .get(
            "/teammates",
            &[
                ("include_details", include_details.to_string()),
                ("include_manager", include_manager.to_string()),
            ],
            "Failed to fetch teammates",
        )
        .await?;
    envelope::decode(&body)
}

/// GET /team - The employee, their manager and their teammates.
///
/// Envelope: bare `{employee, manager, teammates}`.
pub async fn team(gateway: &Gateway) -> Result<TeamInfo> {
    let body = gateway.get("/team", &[], "Failed to fetch team").await?;
    envelope::decode(&body)
}

/// GET /user/identity - Identity behind the current token.
///
/// Envelope: bare `{user_id, email}`.
pub async fn user_identity(gateway: &Gateway) -> Result<UserIdentity> {
    let body = gateway
        .get("/user/identity", &[], "Failed to get user identity")
        .await?;
    envelope::decode(&body)
}
