//! Portal Client
//!
//! Client for the collaboration portal gateway: session handling, a typed
//! controller per gateway resource, and the list/join logic the portal's
//! views share.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod views;

pub use auth::{Session, SessionStore};
pub use config::Config;
pub use errors::{ClientError, Result};
pub use gateway::Gateway;

#[cfg(test)]
mod tests;
