//! Session types
//!
//! The credential pair persisted by the credential store, the phase of the
//! authorization state machine, and the events the session client publishes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }
}

// Tokens never end up in logs.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Where the session sits in the authorization-failure state machine.
///
/// `Refreshing` is entered while a refresh call is outstanding. `Terminated`
/// is absorbing until the next successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Normal,
    Refreshing,
    Terminated,
}

/// Events published to the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Credentials were stored by a successful login
    LoggedIn,
    /// The access token was rotated by the refresh coordinator
    Refreshed,
    /// Unrecoverable authorization failure; a redirect to login is scheduled
    Expired { message: String },
    /// The user logged out
    LoggedOut,
}
