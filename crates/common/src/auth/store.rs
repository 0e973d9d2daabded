//! Credential store over a raw secret backend
//!
//! [`CredentialStore`] owns the key layout and the user-profile
//! serialization; the backend only moves strings. The same layout is used in
//! memory and in the OS keychain, so switching backends never changes what
//! is persisted.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sitedesk_domain::constants::{
    ACCESS_TOKEN_KEY, LAST_SECTION_KEY, REFRESH_TOKEN_KEY, USER_PROFILE_KEY,
};
use sitedesk_domain::{CredentialPair, UserProfile};
use tracing::debug;

use super::error::SessionStoreError;
use super::traits::{SecretStore, SessionStore};

/// [`SessionStore`] implementation layered on any [`SecretStore`].
pub struct CredentialStore<S: SecretStore> {
    backend: S,
}

impl<S: SecretStore> CredentialStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Borrow the raw backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[async_trait]
impl<S: SecretStore> SessionStore for CredentialStore<S> {
    async fn access_token(&self) -> Result<Option<String>, SessionStoreError> {
        self.backend.get_secret(ACCESS_TOKEN_KEY)
    }

    async fn refresh_token(&self) -> Result<Option<String>, SessionStoreError> {
        self.backend.get_secret(REFRESH_TOKEN_KEY)
    }

    async fn store_credentials(
        &self,
        credentials: &CredentialPair,
    ) -> Result<(), SessionStoreError> {
        self.backend.set_secret(ACCESS_TOKEN_KEY, &credentials.access_token)?;
        self.backend.set_secret(REFRESH_TOKEN_KEY, &credentials.refresh_token)?;
        debug!("Credential pair stored");
        Ok(())
    }

    async fn set_access_token(&self, token: &str) -> Result<(), SessionStoreError> {
        self.backend.set_secret(ACCESS_TOKEN_KEY, token)
    }

    async fn set_refresh_token(&self, token: &str) -> Result<(), SessionStoreError> {
        self.backend.set_secret(REFRESH_TOKEN_KEY, token)
    }

    async fn user_profile(&self) -> Result<Option<UserProfile>, SessionStoreError> {
        match self.backend.get_secret(USER_PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_user_profile(&self, profile: &UserProfile) -> Result<(), SessionStoreError> {
        let raw = serde_json::to_string(profile)?;
        self.backend.set_secret(USER_PROFILE_KEY, &raw)
    }

    async fn last_section(&self) -> Result<Option<String>, SessionStoreError> {
        self.backend.get_secret(LAST_SECTION_KEY)
    }

    async fn set_last_section(&self, section: &str) -> Result<(), SessionStoreError> {
        self.backend.set_secret(LAST_SECTION_KEY, section)
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_PROFILE_KEY, LAST_SECTION_KEY] {
            self.backend.delete_secret(key)?;
        }
        debug!("Session store cleared");
        Ok(())
    }
}

/// In-process secret backend.
#[derive(Debug, Default)]
pub struct MemorySecrets {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SecretStore for MemorySecrets {
    fn get_secret(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_secret(&self, key: &str) -> Result<(), SessionStoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Credential store that lives only as long as the process.
pub type MemorySessionStore = CredentialStore<MemorySecrets>;

impl MemorySessionStore {
    /// Empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySecrets::new())
    }

    /// In-memory store pre-seeded with a credential pair.
    #[must_use]
    pub fn with_credentials(credentials: &CredentialPair) -> Self {
        let secrets = MemorySecrets::new();
        {
            let mut entries = secrets.entries.write();
            entries.insert(ACCESS_TOKEN_KEY.to_string(), credentials.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), credentials.refresh_token.clone());
        }
        Self::new(secrets)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
