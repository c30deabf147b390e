//! Resource controllers.
//!
//! One async function per gateway operation. Each performs exactly one HTTP
//! call (except where noted), decodes the endpoint's own envelope, and returns
//! a [`ClientError`] on failure. Mutations never update local state; callers
//! re-fetch.

mod activities;
mod auth;
mod files;
mod manager;
mod meetings;
mod team;

pub use activities::*;
pub use auth::*;
pub use files::*;
pub use manager::*;
pub use meetings::*;
pub use team::*;

use crate::errors::{ClientError, Result};

/// Fail with a validation error naming the first blank field.
fn require(fields: &[(&str, &str)]) -> Result<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ClientError::Validation(format!("{} is required", name))),
        None => Ok(()),
    }
}
