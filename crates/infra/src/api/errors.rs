//! API-specific error types
//!
//! Every non-2xx response and every transport failure surfaces as exactly
//! one [`ApiError`]. Each variant exposes the normalized `{ message, payload }`
//! shape through [`ApiError::message`] and [`ApiError::payload`].

use serde_json::Value;
use sitedesk_common::SessionStoreError;
use sitedesk_domain::SiteDeskError;
use thiserror::Error;

use crate::errors::is_timeout;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Session is gone; the user has to log in again
    Authentication,
    /// Field-level validation failure
    Validation,
    /// Client errors (4xx other than auth) - non-retryable
    Client,
    /// Server errors (5xx) - retryable
    Server,
    /// Network/connection errors - retryable
    Network,
    /// Caller cancelled the request
    Cancelled,
    /// Configuration, storage or decoding problems - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// Unrecoverable authorization failure; the session has been torn down
    #[error("Session terminated: {message}")]
    SessionTerminated { status: Option<u16>, message: String },

    /// Credentials rejected by a login, register or refresh endpoint
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, payload: Option<Value> },

    /// Structured `detail` body, usually field-level messages
    #[error("Validation failed ({status}): {message}")]
    Validation { status: u16, message: String, payload: Value },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String, payload: Option<Value> },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential store error: {0}")]
    Store(String),
}

impl ApiError {
    /// Human-readable message, suitable for a toast or inline error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::SessionTerminated { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Validation { message, .. }
            | Self::Status { message, .. } => message.clone(),
            Self::Network(message)
            | Self::Decode(message)
            | Self::Config(message)
            | Self::Store(message) => message.clone(),
            Self::Timeout | Self::Cancelled => self.to_string(),
        }
    }

    /// Structured error body, when the backend sent one.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::Validation { payload, .. } => Some(payload),
            Self::Unauthorized { payload, .. } | Self::Status { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// HTTP status that produced the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::SessionTerminated { status, .. } => *status,
            Self::Unauthorized { .. } => Some(401),
            Self::Validation { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Cancelled requests should be ignored silently by the caller.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub const fn is_session_terminated(&self) -> bool {
        matches!(self, Self::SessionTerminated { .. })
    }

    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::SessionTerminated { .. } | Self::Unauthorized { .. } => {
                ApiErrorCategory::Authentication
            }
            Self::Validation { .. } => ApiErrorCategory::Validation,
            Self::Status { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Status { .. } => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout => ApiErrorCategory::Network,
            Self::Cancelled => ApiErrorCategory::Cancelled,
            Self::Decode(_) | Self::Config(_) | Self::Store(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if the caller may reasonably retry this request
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Server | ApiErrorCategory::Network)
    }
}

impl From<SiteDeskError> for ApiError {
    fn from(err: SiteDeskError) -> Self {
        if is_timeout(&err) {
            return Self::Timeout;
        }
        match err {
            SiteDeskError::Network(msg) | SiteDeskError::Internal(msg) => Self::Network(msg),
            SiteDeskError::Config(msg) | SiteDeskError::InvalidInput(msg) => Self::Config(msg),
            SiteDeskError::Storage(msg) => Self::Store(msg),
            SiteDeskError::Auth(message) => Self::Unauthorized { message, payload: None },
            SiteDeskError::NotFound(message) => {
                Self::Status { status: 404, message, payload: None }
            }
        }
    }
}

impl From<SessionStoreError> for ApiError {
    fn from(err: SessionStoreError) -> Self {
        Self::Store(err.to_string())
    }
}
