//! Shared building blocks for SiteDesk crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - default: credential store traits, the in-memory store, the navigator port
//! - `platform`: OS keychain backed credential storage via `keyring`
//! - `test-utils`: recording fakes and fixtures for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    CredentialStore, MemorySecrets, MemorySessionStore, Navigator, NoopNavigator, SecretStore,
    SessionStore, SessionStoreError,
};
#[cfg(feature = "platform")]
pub use auth::KeychainSessionStore;
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider};
