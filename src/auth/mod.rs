//! Session store.
//!
//! Holds the bearer token and the denormalized profile of the signed-in user
//! under fixed key names, so a persisted session can be restored by the next
//! process that opens the same store.

mod store;

pub use store::*;

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Storage key names. These must stay stable across releases.
pub mod keys {
    pub const TOKEN: &str = "jwt_token";
    pub const USER_ID: &str = "user_id";
    pub const USER_EMAIL: &str = "user_email";
    pub const USER_FIRSTNAME: &str = "user_firstname";
    pub const USER_LASTNAME: &str = "user_lastname";
    pub const USER_ROLE: &str = "user_role";
    /// Legacy, only ever removed.
    pub const TOKEN_EXPIRES_AT: &str = "token_expires_at";
    /// Legacy duplicate of the token, only ever removed.
    pub const LEGACY_AUTH_TOKEN: &str = "authToken";

    /// Every key the client has ever written.
    pub const ALL: [&str; 8] = [
        TOKEN,
        USER_ID,
        USER_EMAIL,
        USER_FIRSTNAME,
        USER_LASTNAME,
        USER_ROLE,
        TOKEN_EXPIRES_AT,
        LEGACY_AUTH_TOKEN,
    ];
}

/// Role assigned when the gateway does not report one.
pub const DEFAULT_ROLE: &str = "user";

/// Token plus the profile fields written on sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Value used for ownership comparisons by the "my ..." endpoints.
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Raw role string as reported by the gateway.
    pub role: String,
}

/// Process-wide session state behind a single mutation API.
pub struct SessionStore {
    persistent: Mutex<Box<dyn KeyValueStore>>,
    ephemeral: Mutex<MemoryStore>,
}

impl SessionStore {
    /// Create a session store over the given persistent backend.
    pub fn new(persistent: impl KeyValueStore + 'static) -> Self {
        Self {
            persistent: Mutex::new(Box::new(persistent)),
            ephemeral: Mutex::new(MemoryStore::default()),
        }
    }

    /// Session store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Write every profile field. Replaces the previous session entirely.
    pub fn set(&self, session: &Session) {
        let mut store = self.persistent();
        store.set(keys::TOKEN, &session.token);
        store.set(keys::USER_ID, &session.user_id);
        store.set(keys::USER_EMAIL, &session.email);
        store.set(keys::USER_FIRSTNAME, &session.first_name);
        store.set(keys::USER_LASTNAME, &session.last_name);
        store.set(keys::USER_ROLE, &session.role);
    }

    /// Raw read of a single key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.persistent().get(key)
    }

    /// Update only the stored role.
    pub fn set_role(&self, role: &str) {
        self.persistent().set(keys::USER_ROLE, role);
    }

    /// Bearer token, if a non-empty one is stored.
    pub fn token(&self) -> Option<String> {
        self.get(keys::TOKEN).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Typed view of the stored session. Missing profile fields read as empty.
    pub fn current(&self) -> Option<Session> {
        let store = self.persistent();
        let token = store.get(keys::TOKEN).filter(|t| !t.is_empty())?;
        let field = |key: &str| store.get(key).unwrap_or_default();

        Some(Session {
            token,
            user_id: field(keys::USER_ID),
            email: field(keys::USER_EMAIL),
            first_name: field(keys::USER_FIRSTNAME),
            last_name: field(keys::USER_LASTNAME),
            role: store
                .get(keys::USER_ROLE)
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        })
    }

    /// Remove every known key and wipe the ephemeral store.
    pub fn clear(&self) {
        {
            let mut store = self.persistent();
            for key in keys::ALL {
                store.remove(key);
            }
        }
        self.ephemeral().clear();
        tracing::debug!("Session cleared");
    }

    /// Secondary store wiped on sign-out.
    pub fn ephemeral(&self) -> MutexGuard<'_, MemoryStore> {
        self.ephemeral
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persistent(&self) -> MutexGuard<'_, Box<dyn KeyValueStore>> {
        self.persistent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
