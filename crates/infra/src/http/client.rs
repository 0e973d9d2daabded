use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use sitedesk_domain::{ApiConfig, SiteDeskError};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF_DOUBLINGS: u32 = 8;

/// When and how long to wait before sending a request again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based), doubling each time.
    fn delay(self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1))
            .unwrap_or(MAX_BACKOFF_DOUBLINGS)
            .min(MAX_BACKOFF_DOUBLINGS);
        self.base_backoff.saturating_mul(1 << doublings)
    }

    fn retries_response(response: &Response) -> bool {
        response.status().is_server_error()
    }

    fn retries_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }
}

/// Transport shared by every session request.
///
/// Timeouts apply per attempt. With `max_attempts > 1` connection failures,
/// timeouts and 5xx answers are retried with exponential backoff, but only for
/// idempotent methods. `POST` and `PATCH` requests, and bodies that cannot be
/// cloned (multipart streams), always go out exactly once.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with default timeouts and no retries.
    ///
    /// # Errors
    /// Fails when the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, SiteDeskError> {
        Self::builder().build()
    }

    /// Client configured from the `[api]` section.
    ///
    /// # Errors
    /// Fails when the TLS backend cannot be initialised.
    pub fn from_config(config: &ApiConfig) -> Result<Self, SiteDeskError> {
        let builder = Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .max_attempts(config.max_attempts);

        match &config.user_agent {
            Some(agent) => builder.user_agent(agent.clone()).build(),
            None => builder.build(),
        }
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Total attempts per request, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.retry.max_attempts
    }

    /// Send `builder`, retrying idempotent requests per the configured policy.
    ///
    /// Any received response is returned as-is, whatever its status; only
    /// transport failures become errors.
    ///
    /// # Errors
    /// [`SiteDeskError::Network`] for transport failures,
    /// [`SiteDeskError::InvalidInput`] when the request cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, SiteDeskError> {
        let mut current = builder;
        let mut attempt = 1;

        loop {
            let mut replay =
                if attempt < self.retry.max_attempts { current.try_clone() } else { None };
            let request = current.build().map_err(into_domain)?;
            if !request.method().is_idempotent() {
                replay = None;
            }
            let (method, url) = (request.method().clone(), request.url().clone());
            debug!(attempt, %method, %url, "sending HTTP request");

            let outcome = self.client.execute(request).await;
            let retry = match &outcome {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");
                    RetryPolicy::retries_response(response)
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                    RetryPolicy::retries_error(err)
                }
            };

            match replay {
                Some(next) if retry => {
                    let delay = self.retry.delay(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    current = next;
                    attempt += 1;
                }
                _ => return outcome.map_err(into_domain),
            }
        }
    }
}

fn into_domain(err: reqwest::Error) -> SiteDeskError {
    InfraError::from(err).into()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry: RetryPolicy { max_attempts: 1, base_backoff: DEFAULT_BACKOFF },
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout, per attempt.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Initial try plus retries; values below 1 are raised to 1.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Fails when the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, SiteDeskError> {
        let builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .no_proxy();
        let builder = match self.user_agent {
            Some(agent) => builder.user_agent(agent),
            None => builder,
        };

        Ok(HttpClient { client: builder.build().map_err(into_domain)?, retry: self.retry })
    }
}
