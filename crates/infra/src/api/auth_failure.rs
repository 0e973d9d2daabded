//! Classification of authorization failures
//!
//! Decides, per response, whether a failure is recoverable by refreshing the
//! access token, terminal for the whole session, or an ordinary error.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use sitedesk_domain::SessionConfig;

use super::response::ErrorBody;

static CREDENTIAL_ERROR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(invalid|expired|revoked)\s+(access\s+|refresh\s+)?",
        r"(token|credentials?|session|signature)\b",
        r"|\b(token|session|signature)\s+(has\s+)?(expired|revoked)\b",
        r"|could not validate credentials",
        r"|not authenticated",
    ))
    .expect("CREDENTIAL_ERROR_PATTERN should compile - this is a bug")
});

/// What the client should do with a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureAction {
    /// 401 on a normal endpoint: refresh and replay once
    Refresh,
    /// Tear the session down
    Terminate,
    /// 401 on a login/register/refresh endpoint
    RejectCredentials,
    /// Hand the error to the caller untouched
    Surface,
}

/// Maps a status and parsed error body to a [`FailureAction`].
#[derive(Debug, Clone)]
pub(crate) struct AuthFailureDetector {
    bootstrap: Vec<String>,
    codes: Vec<String>,
    match_messages: bool,
}

impl AuthFailureDetector {
    pub(crate) fn new(config: &SessionConfig) -> Self {
        Self {
            bootstrap: config.bootstrap_endpoints().iter().map(|e| (*e).to_string()).collect(),
            codes: config.credential_error_codes.iter().map(|c| c.to_ascii_lowercase()).collect(),
            match_messages: config.match_error_messages,
        }
    }

    pub(crate) fn is_bootstrap(&self, endpoint: &str) -> bool {
        let path = endpoint.split(['?', '#']).next().unwrap_or(endpoint);
        self.bootstrap.iter().any(|candidate| candidate == path)
    }

    /// Whether the body says the presented credentials are no longer valid.
    pub(crate) fn signals_invalid_credentials(&self, body: &ErrorBody) -> bool {
        if let Some(code) = &body.code {
            return self.codes.iter().any(|known| known.eq_ignore_ascii_case(code));
        }
        self.match_messages && CREDENTIAL_ERROR_PATTERN.is_match(&body.message)
    }

    /// Classify a failed response to `endpoint`. `replayed` is set for the
    /// second attempt after a refresh.
    pub(crate) fn classify(
        &self,
        endpoint: &str,
        status: StatusCode,
        body: &ErrorBody,
        replayed: bool,
    ) -> FailureAction {
        if self.is_bootstrap(endpoint) {
            return if status == StatusCode::UNAUTHORIZED {
                FailureAction::RejectCredentials
            } else {
                FailureAction::Surface
            };
        }

        match status {
            StatusCode::FORBIDDEN => FailureAction::Terminate,
            StatusCode::UNAUTHORIZED if replayed => FailureAction::Terminate,
            StatusCode::UNAUTHORIZED => FailureAction::Refresh,
            _ if status.is_client_error() && self.signals_invalid_credentials(body) => {
                FailureAction::Terminate
            }
            _ => FailureAction::Surface,
        }
    }
}
