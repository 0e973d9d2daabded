//! Session credential storage and navigation ports
//!
//! The session client never touches persisted storage or page navigation
//! directly. It talks to two ports defined here so that desktop, CLI and
//! server-side callers can each supply their own implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  SessionStore   │  async port used by the session client
//! └────────┬────────┘
//!          │
//!          └──► CredentialStore<S>   (key layout + profile serialization)
//!                    │
//!                    ├──► MemorySecrets       (process memory, tests)
//!                    └──► KeychainProvider    (OS keychain, `platform`)
//!
//! ┌─────────────────┐
//! │   Navigator     │  redirect to the login route after a forced logout
//! └─────────────────┘
//! ```
//!
//! # Stored keys
//!
//! Four independent string entries: access token, refresh token, the
//! serialized user profile, and the last active UI section. Clearing the
//! session removes all four.

mod error;
#[cfg(feature = "platform")]
mod keychain;
pub mod store;
pub mod traits;

pub use error::SessionStoreError;
#[cfg(feature = "platform")]
pub use keychain::KeychainSessionStore;
pub use store::{CredentialStore, MemorySecrets, MemorySessionStore};
pub use traits::{Navigator, NoopNavigator, SecretStore, SessionStore};
