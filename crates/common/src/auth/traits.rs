//! Traits for credential storage and navigation
//!
//! These traits enable dependency injection and testing by abstracting
//! ambient capabilities (persisted storage, page redirect).

use async_trait::async_trait;
use sitedesk_domain::{CredentialPair, UserProfile};

use super::error::SessionStoreError;

/// Persisted session state shared by every request.
///
/// Writers are the login path, the refresh coordinator and the logout path;
/// every outgoing request reads the access token. Last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current access token, `None` when not signed in
    async fn access_token(&self) -> Result<Option<String>, SessionStoreError>;

    /// Current refresh token, `None` when not signed in
    async fn refresh_token(&self) -> Result<Option<String>, SessionStoreError>;

    /// Persist both tokens (login)
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    async fn store_credentials(&self, credentials: &CredentialPair)
        -> Result<(), SessionStoreError>;

    /// Overwrite the access token in place (refresh)
    async fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError>;

    /// Overwrite the refresh token in place (rotating backends only)
    async fn set_refresh_token(&self, token: &str) -> Result<(), SessionStoreError>;

    async fn user_profile(&self) -> Result<Option<UserProfile>, SessionStoreError>;

    async fn set_user_profile(&self, profile: &UserProfile) -> Result<(), SessionStoreError>;

    /// UI restoration hint, unrelated to authorization
    async fn last_section(&self) -> Result<Option<String>, SessionStoreError>;

    async fn set_last_section(&self, section: &str) -> Result<(), SessionStoreError>;

    /// Remove every persisted session entry (logout, forced logout)
    ///
    /// # Errors
    /// Returns error if the backend rejects a deletion
    async fn clear(&self) -> Result<(), SessionStoreError>;

    /// Whether an access token is currently stored
    async fn has_credentials(&self) -> bool {
        matches!(self.access_token().await, Ok(Some(_)))
    }
}

/// Raw string secret storage backing a [`CredentialStore`](super::CredentialStore).
pub trait SecretStore: Send + Sync {
    /// Read a secret, `Ok(None)` when absent
    fn get_secret(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    fn set_secret(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Delete a secret (idempotent)
    fn delete_secret(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// Sends the user somewhere else, typically the login route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator for headless callers that have nowhere to redirect to.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route = %route, "navigation requested with no navigator installed");
    }
}
