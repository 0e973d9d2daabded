//! Platform credential storage
//!
//! Generic keychain access used by the `platform` credential store.

pub mod keychain;

pub use keychain::{KeychainError, KeychainProvider};
