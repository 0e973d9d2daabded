//! Recording fakes for the session ports.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::auth::{Navigator, SecretStore, SessionStoreError};

/// Navigator that records every requested route.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to, oldest first.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }

    #[must_use]
    pub fn was_redirected_to(&self, route: &str) -> bool {
        self.routes.lock().iter().any(|r| r == route)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

/// Secret backend whose every operation fails, for error-path tests.
#[derive(Debug, Clone, Default)]
pub struct FailingSecrets;

impl SecretStore for FailingSecrets {
    fn get_secret(&self, _key: &str) -> Result<Option<String>, SessionStoreError> {
        Err(SessionStoreError::AccessFailed("keychain locked".to_string()))
    }

    fn set_secret(&self, _key: &str, _value: &str) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::AccessFailed("keychain locked".to_string()))
    }

    fn delete_secret(&self, _key: &str) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::AccessFailed("keychain locked".to_string()))
    }
}
