//! # SiteDesk Infrastructure
//!
//! The impure side of the SiteDesk session client.
//!
//! This crate contains:
//! - The HTTP transport with timeouts and optional retries
//! - The session-aware API client (token refresh, forced logout)
//! - Configuration loading from the environment or JSON/TOML files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements ports defined in `sitedesk-common` (`SessionStore`,
//!   `Navigator`)
//! - Depends on `sitedesk-domain` for configuration and error types

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiError, ApiErrorCategory, ApiResponse, MultipartForm, RequestOptions, SessionClient,
    SessionClientBuilder,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
