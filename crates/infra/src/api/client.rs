//! Session-aware API client
//!
//! [`SessionClient::api_call`] attaches the bearer token, normalizes the
//! response and runs the authorization-failure state machine:
//!
//! ```text
//!  Normal ──401──▶ Refreshing ──ok──▶ Normal (replay once)
//!    │                 │
//!    │                 └──refresh fails──▶ Terminated
//!    └──403 / credential error / second 401──▶ Terminated
//! ```
//!
//! `Terminated` clears the credential store, notifies listeners, schedules a
//! redirect to the login route and fails every later non-bootstrap call
//! without touching the network, until the next login.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sitedesk_common::{KeychainSessionStore, Navigator, NoopNavigator, SessionStore};
use sitedesk_domain::constants::SESSION_EXPIRED_MESSAGE;
use sitedesk_domain::{
    ClientConfig, CredentialPair, SessionConfig, SessionEvent, SessionPhase, UserProfile,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::auth_failure::{AuthFailureDetector, FailureAction};
use super::errors::ApiError;
use super::events::SessionNotifier;
use super::refresh::{RefreshCoordinator, RefreshError};
use super::request::{merge_headers, MultipartForm, RequestBody, RequestOptions};
use super::response::{ApiResponse, RawResponse};
use crate::http::HttpClient;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginGrant {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// How one response settles the call.
enum Settled {
    Done(Result<ApiResponse, ApiError>),
    NeedsRefresh,
}

/// HTTP client that owns the session lifecycle.
pub struct SessionClient {
    http: HttpClient,
    base_url: String,
    session: SessionConfig,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    detector: AuthFailureDetector,
    refresh: RefreshCoordinator,
    notifier: SessionNotifier,
    terminated: AtomicBool,
    /// Bumped by every login, logout and forced logout. Store writes that
    /// change who is signed in happen under this lock.
    epoch: tokio::sync::Mutex<u64>,
    pending_redirect: Mutex<Option<JoinHandle<()>>>,
}

impl SessionClient {
    /// Start building a client for `config`.
    #[must_use]
    pub fn builder(config: ClientConfig) -> SessionClientBuilder {
        SessionClientBuilder::new(config)
    }

    /// Client over the given store and navigator with a transport built from
    /// `config.api`.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid base URL.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Self::builder(config).store(store).navigator(navigator).build()
    }

    /// Where the session sits in the authorization state machine.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_terminated() {
            SessionPhase::Terminated
        } else if self.refresh.is_refreshing() {
            SessionPhase::Refreshing
        } else {
            SessionPhase::Normal
        }
    }

    /// Base URL every endpoint is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribe to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.notifier.subscribe()
    }

    /// Register a callback for forced logouts; it receives the user-facing
    /// message.
    pub fn on_session_expired<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notifier.on_session_expired(handler);
    }

    /// Issue a request to `endpoint` (appended to the base URL as-is).
    ///
    /// A 401 on a normal endpoint is answered by refreshing the access token
    /// once and replaying the request; the caller only sees the replayed
    /// result.
    ///
    /// # Errors
    /// See [`ApiError`]. Cancelling the token in `options` resolves the call
    /// to [`ApiError::Cancelled`].
    #[instrument(skip(self, options), fields(method = %options.method()))]
    pub async fn api_call(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        match options.cancel_token().cloned() {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!("request cancelled by caller");
                        Err(ApiError::Cancelled)
                    }
                    result = self.dispatch(endpoint, &options) => result,
                }
            }
            None => self.dispatch(endpoint, &options).await,
        }
    }

    /// `GET` and deserialize.
    ///
    /// # Errors
    /// As [`Self::api_call`], plus [`ApiError::Decode`] on a shape mismatch.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.api_call(endpoint, RequestOptions::get()).await?.deserialize()
    }

    /// `POST` a JSON body and deserialize the answer.
    ///
    /// # Errors
    /// As [`Self::get`].
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.api_call(endpoint, RequestOptions::post().json(body)?).await?.deserialize()
    }

    /// `PUT` a JSON body and deserialize the answer.
    ///
    /// # Errors
    /// As [`Self::get`].
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.api_call(endpoint, RequestOptions::put().json(body)?).await?.deserialize()
    }

    /// `PATCH` a JSON body and deserialize the answer.
    ///
    /// # Errors
    /// As [`Self::get`].
    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.api_call(endpoint, RequestOptions::patch().json(body)?).await?.deserialize()
    }

    /// `DELETE` and deserialize; use `Option<T>` or `()` for empty answers.
    ///
    /// # Errors
    /// As [`Self::get`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.api_call(endpoint, RequestOptions::delete()).await?.deserialize()
    }

    /// `POST` a multipart form; the transport sets the boundary header.
    ///
    /// # Errors
    /// As [`Self::get`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: MultipartForm,
    ) -> Result<T, ApiError> {
        self.api_call(endpoint, RequestOptions::post().multipart(form)).await?.deserialize()
    }

    /// Log in with username and password.
    ///
    /// Stores the issued credential pair (and the profile, when the backend
    /// returns one), leaves the terminated state and emits
    /// [`SessionEvent::LoggedIn`].
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] when the backend rejects the credentials.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserProfile>, ApiError> {
        let options = RequestOptions::post().json(&LoginRequest { username, password })?;
        let grant: LoginGrant =
            self.api_call(&self.session.login_endpoint, options).await?.deserialize()?;

        let credentials = CredentialPair::new(grant.access_token, grant.refresh_token);
        self.begin_session(&credentials, grant.user.as_ref()).await?;
        Ok(grant.user)
    }

    /// Install credentials obtained outside [`Self::login`] and reset the
    /// session to `Normal`.
    ///
    /// # Errors
    /// [`ApiError::Store`] when the credential store cannot be written.
    pub async fn begin_session(
        &self,
        credentials: &CredentialPair,
        user: Option<&UserProfile>,
    ) -> Result<(), ApiError> {
        self.cancel_pending_redirect();
        {
            let mut epoch = self.epoch.lock().await;
            *epoch += 1;
            self.store.store_credentials(credentials).await?;
            if let Some(user) = user {
                self.store.set_user_profile(user).await?;
            }
            self.terminated.store(false, Ordering::Release);
        }
        info!("session started");
        self.notifier.publish(SessionEvent::LoggedIn);
        Ok(())
    }

    /// User-initiated logout.
    ///
    /// Tells the backend (best effort), clears the store, emits
    /// [`SessionEvent::LoggedOut`] and navigates to the login route right
    /// away.
    ///
    /// # Errors
    /// [`ApiError::Store`] when the credential store cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.store.access_token().await {
            Ok(Some(token)) => {
                let options = RequestOptions::post();
                match self.execute(&self.session.logout_endpoint, &options, Some(&token)).await {
                    Ok(raw) if raw.status.is_success() => debug!("backend logout acknowledged"),
                    Ok(raw) => debug!(status = %raw.status, "backend logout rejected, ignoring"),
                    Err(err) => debug!(error = %err, "backend logout failed, ignoring"),
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "could not read access token for logout"),
        }

        {
            let mut epoch = self.epoch.lock().await;
            *epoch += 1;
            self.terminated.store(true, Ordering::Release);
            self.store.clear().await?;
        }
        self.cancel_pending_redirect();
        info!("user logged out");
        self.notifier.publish(SessionEvent::LoggedOut);
        self.navigator.navigate(&self.session.login_route);
        Ok(())
    }

    /// Tear the session down as if the backend had rejected it.
    ///
    /// Idempotent: only the first call after a login notifies and schedules
    /// the redirect. Returns the error an in-flight call would have seen.
    pub async fn force_logout(&self, reason: &str) -> ApiError {
        self.terminate(None, reason.to_string()).await
    }

    /// Profile stored at login, if any.
    ///
    /// # Errors
    /// [`ApiError::Store`] when the store cannot be read or the profile is
    /// corrupt.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, ApiError> {
        Ok(self.store.user_profile().await?)
    }

    /// UI section the user last worked in.
    ///
    /// # Errors
    /// [`ApiError::Store`] when the store cannot be read.
    pub async fn last_section(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.last_section().await?)
    }

    /// # Errors
    /// [`ApiError::Store`] when the store cannot be written.
    pub async fn set_last_section(&self, section: &str) -> Result<(), ApiError> {
        Ok(self.store.set_last_section(section).await?)
    }

    async fn dispatch(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let bootstrap = self.detector.is_bootstrap(endpoint);
        if !bootstrap && self.is_terminated() {
            debug!("session terminated, refusing request");
            return Err(session_expired());
        }

        let sent_token = self.store.access_token().await?;
        let raw = self.execute(endpoint, options, sent_token.as_deref()).await?;
        match self.settle(endpoint, raw, false).await {
            Settled::Done(result) => result,
            Settled::NeedsRefresh => self.refresh_and_replay(endpoint, options, sent_token).await,
        }
    }

    async fn refresh_and_replay(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        sent_token: Option<String>,
    ) -> Result<ApiResponse, ApiError> {
        if self.is_terminated() {
            return Err(session_expired());
        }
        // Another caller may already have rotated the token we were sent with.
        let current = self.store.access_token().await?;
        let token = match current {
            Some(token) if Some(&token) != sent_token.as_ref() => {
                debug!("access token already rotated, replaying");
                token
            }
            _ => match self.refresh.run(|| self.request_new_access_token()).await {
                Ok(token) => token,
                Err(RefreshError::Superseded) if !self.is_terminated() => {
                    // A login replaced the session mid-refresh; use its token.
                    match self.store.access_token().await? {
                        Some(token) => token,
                        None => return Err(session_expired()),
                    }
                }
                Err(RefreshError::Superseded) => return Err(session_expired()),
                Err(err) => {
                    warn!(error = %err, "token refresh failed");
                    return Err(self.terminate(err.status(), err.to_string()).await);
                }
            },
        };

        if self.is_terminated() {
            debug!("session terminated during refresh, not replaying");
            return Err(session_expired());
        }
        debug!("replaying request with refreshed token");
        let raw = self.execute(endpoint, options, Some(&token)).await?;
        match self.settle(endpoint, raw, true).await {
            Settled::Done(result) => result,
            Settled::NeedsRefresh => Err(self
                .terminate(Some(401), "Request was rejected after token refresh".to_string())
                .await),
        }
    }

    async fn settle(&self, endpoint: &str, raw: RawResponse, replayed: bool) -> Settled {
        if raw.status.is_success() {
            return Settled::Done(raw.into_success());
        }

        let status = raw.status;
        let body = raw.error_body();
        debug!(%status, replayed, "request failed");

        match self.detector.classify(endpoint, status, &body, replayed) {
            FailureAction::Refresh => Settled::NeedsRefresh,
            FailureAction::Terminate => {
                Settled::Done(Err(self.terminate(Some(status.as_u16()), body.message).await))
            }
            FailureAction::RejectCredentials => Settled::Done(Err(ApiError::Unauthorized {
                message: body.message,
                payload: body.payload,
            })),
            FailureAction::Surface => Settled::Done(Err(body.into_error(status))),
        }
    }

    async fn execute(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut defaults = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ApiError::Config("stored access token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            defaults.insert(AUTHORIZATION, value);
        }
        if options.wants_json_content_type() {
            defaults.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        let headers = merge_headers(defaults, options.headers());

        let builder = self.http.request(options.method().clone(), &url).headers(headers);
        let builder = match options.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value).map_err(|err| {
                ApiError::Config(format!("request body is not serializable: {err}"))
            })?),
            RequestBody::Text(text) => builder.body(text.clone()),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        let response = self.http.send(builder).await?;
        RawResponse::read(response).await
    }

    #[instrument(skip(self))]
    async fn request_new_access_token(&self) -> Result<String, RefreshError> {
        let started_in = *self.epoch.lock().await;
        let refresh_token = self
            .store
            .refresh_token()
            .await
            .map_err(|err| RefreshError::Store(err.to_string()))?
            .ok_or(RefreshError::MissingRefreshToken)?;

        let url = format!("{}{}", self.base_url, self.session.refresh_endpoint);
        let builder = self
            .http
            .request(Method::POST, &url)
            .json(&RefreshRequest { refresh_token: &refresh_token });
        let response = self
            .http
            .send(builder)
            .await
            .map_err(|err| RefreshError::Transport(err.to_string()))?;
        let raw = RawResponse::read(response)
            .await
            .map_err(|err| RefreshError::Transport(err.message()))?;

        if !raw.status.is_success() {
            let status = raw.status.as_u16();
            return Err(RefreshError::Rejected { status, message: raw.error_body().message });
        }

        let grant: RefreshGrant = match raw.into_success() {
            Ok(ApiResponse::Json(value)) => {
                serde_json::from_value(value).map_err(|_| RefreshError::MalformedResponse)?
            }
            _ => return Err(RefreshError::MalformedResponse),
        };

        let epoch = self.epoch.lock().await;
        if *epoch != started_in || self.is_terminated() {
            debug!("session changed while refreshing, discarding new token");
            return Err(RefreshError::Superseded);
        }
        self.store
            .set_access_token(&grant.access_token)
            .await
            .map_err(|err| RefreshError::Store(err.to_string()))?;
        if let Some(rotated) = grant.refresh_token.as_deref() {
            self.store
                .set_refresh_token(rotated)
                .await
                .map_err(|err| RefreshError::Store(err.to_string()))?;
        }
        drop(epoch);

        info!(rotated_refresh_token = grant.refresh_token.is_some(), "access token refreshed");
        self.notifier.publish(SessionEvent::Refreshed);
        Ok(grant.access_token)
    }

    /// Forced logout. Returns the error handed to the caller.
    async fn terminate(&self, status: Option<u16>, message: String) -> ApiError {
        let first = self
            .terminated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if first {
            warn!(?status, reason = %message, "unrecoverable authorization failure, logging out");
            self.notifier.publish(SessionEvent::Expired {
                message: SESSION_EXPIRED_MESSAGE.to_string(),
            });
            {
                let mut epoch = self.epoch.lock().await;
                *epoch += 1;
                if let Err(err) = self.store.clear().await {
                    warn!(error = %err, "failed to clear credential store during forced logout");
                }
            }
            self.schedule_redirect();
        }

        ApiError::SessionTerminated { status, message }
    }

    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    fn schedule_redirect(&self) {
        let navigator = Arc::clone(&self.navigator);
        let route = self.session.login_route.clone();
        let delay = Duration::from_millis(self.session.logout_redirect_delay_ms);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(route = %route, "redirecting to login");
            navigator.navigate(&route);
        });

        if let Some(previous) = self.pending_redirect.lock().replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending_redirect(&self) {
        if let Some(handle) = self.pending_redirect.lock().take() {
            handle.abort();
        }
    }
}

/// Error for calls made (or finishing) after the session was torn down.
fn session_expired() -> ApiError {
    ApiError::SessionTerminated { status: None, message: SESSION_EXPIRED_MESSAGE.to_string() }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url)
            .field("phase", &self.phase())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SessionClient`].
///
/// Without an explicit store the client persists credentials in the OS
/// keychain under `storage.keychain_service`; without a navigator redirects
/// are only logged.
pub struct SessionClientBuilder {
    config: ClientConfig,
    http: Option<HttpClient>,
    store: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl SessionClientBuilder {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config, http: None, store: None, navigator: None }
    }

    /// Use a preconfigured transport instead of one built from `config.api`.
    #[must_use]
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid base URL or when the
    /// transport cannot be built.
    pub fn build(self) -> Result<SessionClient, ApiError> {
        let ClientConfig { api, session, storage, .. } = self.config;

        url::Url::parse(&api.base_url).map_err(|err| {
            ApiError::Config(format!("invalid API base URL '{}': {err}", api.base_url))
        })?;

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::from_config(&api)?,
        };
        let store = self.store.unwrap_or_else(|| {
            Arc::new(KeychainSessionStore::for_service(storage.keychain_service))
        });
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(NoopNavigator));

        Ok(SessionClient {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            detector: AuthFailureDetector::new(&session),
            session,
            store,
            navigator,
            refresh: RefreshCoordinator::new(),
            notifier: SessionNotifier::default(),
            terminated: AtomicBool::new(false),
            epoch: tokio::sync::Mutex::new(0),
            pending_redirect: Mutex::new(None),
        })
    }
}
