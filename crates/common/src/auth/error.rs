//! Credential store errors

use thiserror::Error;

/// Errors raised by [`SessionStore`](super::SessionStore) implementations.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Backend access failed (permission denied, keychain locked, ...)
    #[error("Credential store access failed: {0}")]
    AccessFailed(String),

    /// A stored value could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "platform")]
impl From<crate::security::KeychainError> for SessionStoreError {
    fn from(err: crate::security::KeychainError) -> Self {
        Self::AccessFailed(err.to_string())
    }
}
