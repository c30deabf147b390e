//! User and sign-up/sign-in payloads.

use serde::{Deserialize, Serialize};

use super::lenient_string;

/// Client-side role for administrators.
pub const ROLE_ADMIN: &str = "admin";
/// Client-side role for everyone else.
pub const ROLE_USER: &str = "user";
/// Gateway role that maps to [`ROLE_ADMIN`] on sign-in.
pub const ROLE_EMPLOYER: &str = "EMPLOYER";

/// Map a gateway role onto the client role returned by sign-in.
pub fn client_role(server_role: Option<&str>) -> &'static str {
    match server_role {
        Some(ROLE_EMPLOYER) => ROLE_ADMIN,
        _ => ROLE_USER,
    }
}

/// The signed-in user as returned by sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub date_of_birth: String,
    pub address: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// Input for creating an account.
#[derive(Clone, Default)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: String,
    pub address: String,
    /// Manager invitation code, when signing up under a manager.
    pub manager_code: Option<String>,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("date_of_birth", &self.date_of_birth)
            .field("address", &self.address)
            .field("manager_code", &self.manager_code)
            .finish()
    }
}

/// Wire body for `POST /signup`.
#[derive(Serialize)]
pub(crate) struct SignUpBody<'a> {
    pub email: &'a str,
    #[serde(rename = "Password")]
    pub password: &'a str,
    #[serde(rename = "FirstName")]
    pub first_name: &'a str,
    #[serde(rename = "LastName")]
    pub last_name: &'a str,
    #[serde(rename = "DateOfBirth")]
    pub date_of_birth: &'a str,
    #[serde(rename = "Address")]
    pub address: &'a str,
    #[serde(rename = "managercode", skip_serializing_if = "Option::is_none")]
    pub manager_code: Option<&'a str>,
}

impl<'a> From<&'a SignUpRequest> for SignUpBody<'a> {
    fn from(request: &'a SignUpRequest) -> Self {
        Self {
            email: &request.email,
            password: &request.password,
            first_name: &request.first_name,
            last_name: &request.last_name,
            date_of_birth: &request.date_of_birth,
            address: &request.address,
            manager_code: request.manager_code.as_deref().filter(|c| !c.is_empty()),
        }
    }
}

/// Wire body for `POST /login`.
#[derive(Serialize)]
pub(crate) struct SignInBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Success payload of `POST /signup` and `POST /login`.
///
/// Sign-up names the token `AuthToken`, sign-in names it `Token`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "AuthToken", default)]
    pub auth_token: Option<String>,
    #[serde(rename = "Token", default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Non-empty value, or `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
