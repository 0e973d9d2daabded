//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use sitedesk_common::SessionStoreError;
use sitedesk_domain::SiteDeskError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SiteDeskError);

impl From<InfraError> for SiteDeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SiteDeskError> for InfraError {
    fn from(value: SiteDeskError) -> Self {
        Self(value)
    }
}

const TIMEOUT_MESSAGE: &str = "HTTP request timed out";

trait IntoSiteDeskError {
    fn into_sitedesk(self) -> SiteDeskError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SiteDeskError */
/* -------------------------------------------------------------------------- */

impl IntoSiteDeskError for HttpError {
    fn into_sitedesk(self) -> SiteDeskError {
        if self.is_timeout() {
            return SiteDeskError::Network(TIMEOUT_MESSAGE.into());
        }

        if self.is_connect() {
            return SiteDeskError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return SiteDeskError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SiteDeskError::Auth(message),
                404 => SiteDeskError::NotFound(message),
                400..=499 => SiteDeskError::InvalidInput(message),
                _ => SiteDeskError::Network(message),
            };
        }

        SiteDeskError::Network(format!("HTTP transport error: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_sitedesk())
    }
}

/* -------------------------------------------------------------------------- */
/* SessionStoreError → SiteDeskError */
/* -------------------------------------------------------------------------- */

impl IntoSiteDeskError for SessionStoreError {
    fn into_sitedesk(self) -> SiteDeskError {
        SiteDeskError::Storage(self.to_string())
    }
}

impl From<SessionStoreError> for InfraError {
    fn from(value: SessionStoreError) -> Self {
        Self(value.into_sitedesk())
    }
}

/// `true` when the domain error came from a timed-out transport.
pub(crate) fn is_timeout(err: &SiteDeskError) -> bool {
    matches!(err, SiteDeskError::Network(msg) if msg == TIMEOUT_MESSAGE)
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
