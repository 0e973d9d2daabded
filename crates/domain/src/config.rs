//! Configuration structures
//!
//! Loaded by `sitedesk-infra`'s config loader from the environment or from a
//! JSON/TOML file. Every field except the API base URL has a default, so a
//! partial file is enough.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOG_FILTER, LOGIN_ENDPOINT, LOGIN_ROUTE,
    LOGOUT_ENDPOINT, LOGOUT_REDIRECT_DELAY_MS, REFRESH_ENDPOINT, REGISTER_ENDPOINT,
};

/// Root configuration for the session client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Default configuration pointing at the given backend.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig { base_url: base_url.into(), ..ApiConfig::default() },
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to (no trailing slash needed)
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Total transport attempts per idempotent request (1 = no automatic retry)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_attempts: default_max_attempts(),
            user_agent: None,
        }
    }
}

/// Session and authorization-failure handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub login_endpoint: String,
    pub register_endpoint: String,
    pub refresh_endpoint: String,
    pub logout_endpoint: String,
    /// Client-side route the navigator is sent to after a forced logout
    pub login_route: String,
    /// Delay between the session-expired notification and the redirect
    pub logout_redirect_delay_ms: u64,
    /// Fall back to matching error prose when the body carries no error code
    pub match_error_messages: bool,
    /// Machine-readable error codes that mean "credentials are no longer valid"
    pub credential_error_codes: Vec<String>,
}

impl SessionConfig {
    /// Endpoints that never trigger a refresh on 401.
    #[must_use]
    pub fn bootstrap_endpoints(&self) -> [&str; 3] {
        [&self.login_endpoint, &self.register_endpoint, &self.refresh_endpoint]
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_endpoint: LOGIN_ENDPOINT.to_string(),
            register_endpoint: REGISTER_ENDPOINT.to_string(),
            refresh_endpoint: REFRESH_ENDPOINT.to_string(),
            logout_endpoint: LOGOUT_ENDPOINT.to_string(),
            login_route: LOGIN_ROUTE.to_string(),
            logout_redirect_delay_ms: LOGOUT_REDIRECT_DELAY_MS,
            match_error_messages: true,
            credential_error_codes: vec![
                "token_expired".to_string(),
                "token_invalid".to_string(),
                "invalid_credentials".to_string(),
                "session_expired".to_string(),
            ],
        }
    }
}

/// Credential store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Keychain service name used by the platform credential store
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string() }
    }
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: DEFAULT_LOG_FILTER.to_string(), json: false }
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_max_attempts() -> usize {
    1
}
