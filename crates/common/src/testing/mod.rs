//! Testing utilities and helpers
//!
//! - **[`mocks`]**: recording fakes for the navigation and storage ports
//! - **[`fixtures`]**: canned credentials and profiles
//!
//! Enabled with the `test-utils` feature.

pub mod fixtures;
pub mod mocks;

pub use fixtures::{sample_credentials, sample_profile};
pub use mocks::{FailingSecrets, RecordingNavigator};
