//! User profile types
//!
//! Profile returned by the backend at login and persisted next to the
//! credential pair so the UI can restore the signed-in user.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Fields the client does not interpret (permissions, project scopes, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Name to show in notifications and logs.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username.as_deref().or(self.email.as_deref()).unwrap_or("unknown user")
    }
}
