//! Application constants
//!
//! Centralized location for domain-level constants used by the session client
//! and the credential store implementations.

// Credential store keys
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_PROFILE_KEY: &str = "user";
pub const LAST_SECTION_KEY: &str = "last_active_section";

// Backend endpoints
pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const LOGOUT_ENDPOINT: &str = "/logout";

// Client-side routes
pub const LOGIN_ROUTE: &str = "/login";

// Forced logout
pub const LOGOUT_REDIRECT_DELAY_MS: u64 = 3000;
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

// Event fan-out
pub const SESSION_EVENT_CAPACITY: usize = 32;

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "SiteDesk.session";
pub const DEFAULT_LOG_FILTER: &str = "info";
