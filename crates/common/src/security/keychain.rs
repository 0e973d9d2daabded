//! OS keychain access
//!
//! Moves strings in and out of the platform credential store (Keychain
//! Access, Windows Credential Manager, Secret Service) under one service
//! name. Key layout belongs to `auth::store`.
//!
//! ```no_run
//! use sitedesk_common::security::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("SiteDesk.session");
//! keychain.write("last_active_section", "inventory")?;
//! assert_eq!(keychain.read("last_active_section")?.as_deref(), Some("inventory"));
//! # Ok::<(), sitedesk_common::security::KeychainError>(())
//! ```

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

/// Keychain entries for one service name; each key is an account.
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Read an entry, `Ok(None)` when it does not exist.
    ///
    /// # Errors
    /// [`KeychainError`] when the keychain is locked or unavailable.
    pub fn read(&self, key: &str) -> Result<Option<String>, KeychainError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(source) => Err(KeychainError::Read { key: key.to_string(), source }),
        }
    }

    /// # Errors
    /// [`KeychainError::Write`] when the keychain rejects the value.
    pub fn write(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key, "writing keychain entry");
        self.entry(key)?
            .set_password(value)
            .map_err(|source| KeychainError::Write { key: key.to_string(), source })
    }

    /// Delete an entry; a missing entry is not an error.
    ///
    /// # Errors
    /// [`KeychainError::Delete`] for any other keychain failure.
    pub fn remove(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key, "removing keychain entry");
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(source) => Err(KeychainError::Delete { key: key.to_string(), source }),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, key)
            .map_err(|source| KeychainError::Entry { key: key.to_string(), source })
    }
}

#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Invalid keychain entry '{key}': {source}")]
    Entry {
        key: String,
        #[source]
        source: keyring::Error,
    },

    #[error("Failed to read '{key}' from keychain: {source}")]
    Read {
        key: String,
        #[source]
        source: keyring::Error,
    },

    #[error("Failed to write '{key}' to keychain: {source}")]
    Write {
        key: String,
        #[source]
        source: keyring::Error,
    },

    #[error("Failed to delete '{key}' from keychain: {source}")]
    Delete {
        key: String,
        #[source]
        source: keyring::Error,
    },
}
