//! Keychain-backed session store
//!
//! Adapts [`KeychainProvider`] to the [`SecretStore`] contract so the
//! credential pair, profile and UI hint persist across restarts in the OS
//! keychain.

use crate::auth::error::SessionStoreError;
use crate::auth::store::CredentialStore;
use crate::auth::traits::SecretStore;
use crate::security::KeychainProvider;

impl SecretStore for KeychainProvider {
    fn get_secret(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.read(key)?)
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        Ok(self.write(key, value)?)
    }

    fn delete_secret(&self, key: &str) -> Result<(), SessionStoreError> {
        Ok(self.remove(key)?)
    }
}

/// Session store persisted in the platform keychain.
pub type KeychainSessionStore = CredentialStore<KeychainProvider>;

impl KeychainSessionStore {
    /// Keychain store scoped to `service_name`.
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self::new(KeychainProvider::new(service_name))
    }
}
