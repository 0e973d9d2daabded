//! # SiteDesk Domain
//!
//! Domain types shared by every SiteDesk crate.
//!
//! This crate contains:
//! - The top-level error type and `Result` alias
//! - Configuration structures for the API session client
//! - Session types (credential pair, user profile, session events)
//! - Domain constants (store keys, default routes and endpoints)
//!
//! ## Architecture
//! - No dependencies on other SiteDesk crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
