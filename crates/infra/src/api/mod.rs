//! Session-aware API client
//!
//! - [`SessionClient`]: bearer auth, response normalization, refresh-and-replay
//!   on 401 and forced logout on unrecoverable failures
//! - [`RefreshCoordinator`]: single-flight refresh with a FIFO waiter queue
//! - [`ApiError`]: one error value per failed call

mod auth_failure;
pub mod client;
pub mod errors;
pub mod events;
pub mod refresh;
pub mod request;
pub mod response;

pub use client::{SessionClient, SessionClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use events::{SessionExpiredHandler, SessionNotifier};
pub use refresh::{RefreshCoordinator, RefreshError, RefreshOutcome};
pub use request::{MultipartForm, RequestBody, RequestOptions};
pub use response::ApiResponse;
