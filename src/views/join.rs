//! Password-gated meeting join flow.

use crate::api::join_meeting_with_password;
use crate::errors::{ClientError, Result};
use crate::gateway::Gateway;

/// Opens meeting URLs for the user.
pub trait Launcher {
    /// Open `url` in a new browsing context. Returns `false` if the context
    /// reports itself blocked or closed right away.
    fn open_new_context(&mut self, url: &str) -> bool;

    /// Navigate the current context to `url`.
    fn navigate_current(&mut self, url: &str);
}

/// Where the meeting URL ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    NewContext,
    /// The new context was blocked; the current one navigated instead.
    CurrentContext,
}

/// Open `url`, falling back to the current context.
///
/// Best effort: a blocker that does not report synchronously is not detected.
pub fn launch(launcher: &mut impl Launcher, url: &str) -> LaunchTarget {
    if launcher.open_new_context(url) {
        LaunchTarget::NewContext
    } else {
        tracing::info!("New context blocked, navigating current context");
        launcher.navigate_current(url);
        LaunchTarget::CurrentContext
    }
}

/// State of the join flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinState {
    Idle,
    /// Waiting for a password. `last_error` holds the previous failure.
    PasswordPrompt {
        meeting_id: String,
        last_error: Option<String>,
    },
    Joining {
        meeting_id: String,
    },
    Joined {
        url: String,
        target: LaunchTarget,
    },
}

/// Idle → PasswordPrompt → Joining → Joined, or back to PasswordPrompt on
/// failure so the user can retry. No timeout beyond the transport's own.
#[derive(Debug)]
pub struct JoinMeetingFlow {
    state: JoinState,
}

impl JoinMeetingFlow {
    pub fn new() -> Self {
        Self {
            state: JoinState::Idle,
        }
    }

    pub fn state(&self) -> &JoinState {
        &self.state
    }

    /// Ask for the password of `meeting_id`.
    pub fn prompt(&mut self, meeting_id: impl Into<String>) {
        self.state = JoinState::PasswordPrompt {
            meeting_id: meeting_id.into(),
            last_error: None,
        };
    }

    /// Dismiss the prompt.
    pub fn cancel(&mut self) {
        self.state = JoinState::Idle;
    }

    /// Submit `password` for the prompted meeting and open the returned URL.
    ///
    /// A blank password is rejected without contacting the gateway. Any
    /// failure is returned and leaves the flow at the prompt with the message
    /// recorded.
    pub async fn submit(
        &mut self,
        gateway: &Gateway,
        password: &str,
        launcher: &mut impl Launcher,
    ) -> Result<LaunchTarget> {
        let meeting_id = match &self.state {
            JoinState::PasswordPrompt { meeting_id, .. } => meeting_id.clone(),
            _ => {
                return Err(ClientError::Validation(
                    "No meeting is waiting for a password".to_string(),
                ))
            }
        };

        if password.trim().is_empty() {
            return Err(ClientError::Validation("Password is required".to_string()));
        }

        self.state = JoinState::Joining {
            meeting_id: meeting_id.clone(),
        };

        match join_meeting_with_password(gateway, &meeting_id, password).await {
            Ok(response) => {
                let target = launch(launcher, &response.redirect_url);
                self.state = JoinState::Joined {
                    url: response.redirect_url,
                    target,
                };
                Ok(target)
            }
            Err(e) => {
                self.state = JoinState::PasswordPrompt {
                    meeting_id,
                    last_error: Some(e.message().to_string()),
                };
                Err(e)
            }
        }
    }
}

impl Default for JoinMeetingFlow {
    fn default() -> Self {
        Self::new()
    }
}
