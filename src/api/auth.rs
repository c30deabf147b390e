//! Sign-up, sign-in and sign-out.

use reqwest::Method;

use super::require;
use crate::auth::{Session, DEFAULT_ROLE};
use crate::errors::{ClientError, Result};
use crate::gateway::{envelope, Gateway};
use crate::models::{client_role, non_empty, AuthResponse, SignInBody, SignUpBody, SignUpRequest, User};

/// POST /signup - Create an account and start a session.
///
/// Envelope: bare `{id, AuthToken, firstname, lastname, role}`.
pub async fn sign_up(gateway: &Gateway, request: &SignUpRequest) -> Result<User> {
    require(&[
        ("First name", request.first_name.as_str()),
        ("Last name", request.last_name.as_str()),
        ("Email", request.email.as_str()),
        ("Password", request.password.as_str()),
    ])?;

    let http = gateway
        .request_unauthenticated(Method::POST, "/signup")
        .json(&SignUpBody::from(request));
    let body = gateway.send(http, "Signup failed").await?;

    let response: AuthResponse = envelope::decode(&body)?;
    let token = non_empty(response.auth_token)
        .ok_or_else(|| ClientError::Decode("Signup response is missing AuthToken".to_string()))?;

    let first_name = non_empty(response.firstname).unwrap_or_else(|| request.first_name.clone());
    let last_name = non_empty(response.lastname).unwrap_or_else(|| request.last_name.clone());
    let role = non_empty(response.role).unwrap_or_else(|| DEFAULT_ROLE.to_string());

    gateway.session().set(&Session {
        token,
        user_id: response.id.clone(),
        email: request.email.clone(),
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        role: role.clone(),
    });
    tracing::info!(user_id = %response.id, "Signed up");

    Ok(User {
        id: response.id,
        email: request.email.clone(),
        firstname: first_name,
        lastname: last_name,
        date_of_birth: request.date_of_birth.clone(),
        address: request.address.clone(),
        role,
    })
}

/// POST /login - Start a session.
///
/// Envelope: bare `{id, Token, email, firstname, lastname, role}`. The session
/// keeps the raw gateway role; the returned user carries the client role
/// (`EMPLOYER` reads as `admin`, anything else as `user`).
pub async fn sign_in(gateway: &Gateway, email: &str, password: &str) -> Result<User> {
    require(&[("Email", email), ("Password", password)])?;

    let http = gateway
        .request_unauthenticated(Method::POST, "/login")
        .json(&SignInBody { email, password });
    let body = gateway.send(http, "Login failed").await?;

    let response: AuthResponse = envelope::decode(&body)?;
    let token = non_empty(response.token)
        .ok_or_else(|| ClientError::Decode("Login response is missing Token".to_string()))?;

    let first_name = non_empty(response.firstname).unwrap_or_default();
    let last_name = non_empty(response.lastname).unwrap_or_default();
    let role = client_role(response.role.as_deref());

    gateway.session().set(&Session {
        token,
        user_id: response.id.clone(),
        email: email.to_string(),
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        role: non_empty(response.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
    });
    tracing::info!(user_id = %response.id, role, "Signed in");

    Ok(User {
        id: response.id,
        email: non_empty(response.email).unwrap_or_else(|| email.to_string()),
        firstname: first_name,
        lastname: last_name,
        date_of_birth: String::new(),
        address: String::new(),
        role: role.to_string(),
    })
}

/// End the session locally. The gateway is not contacted.
pub fn sign_out(gateway: &Gateway) {
    gateway.session().clear();
    tracing::info!("Signed out");
}
