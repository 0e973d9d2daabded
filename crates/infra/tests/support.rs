use std::sync::Arc;
use std::time::Duration;

use sitedesk_common::testing::{sample_credentials, RecordingNavigator};
use sitedesk_common::{MemorySessionStore, SessionStore};
use sitedesk_domain::{ClientConfig, CredentialPair};
use sitedesk_infra::SessionClient;
use wiremock::MockServer;

/// Redirect delay used by every harness; short so tests stay fast.
pub const REDIRECT_DELAY_MS: u64 = 50;

/// Session client wired to a fresh mock backend, an in-memory store and a
/// recording navigator.
pub struct Harness {
    pub server: MockServer,
    pub client: SessionClient,
    pub store: Arc<MemorySessionStore>,
    pub navigator: RecordingNavigator,
}

impl Harness {
    /// Logged-in session holding [`sample_credentials`].
    pub async fn logged_in() -> Self {
        Self::build(Some(sample_credentials()), |_| {}).await
    }

    /// No credentials stored.
    pub async fn anonymous() -> Self {
        Self::build(None, |_| {}).await
    }

    pub async fn build(
        credentials: Option<CredentialPair>,
        configure: impl FnOnce(&mut ClientConfig),
    ) -> Self {
        let server = MockServer::start().await;

        let mut config = ClientConfig::with_base_url(server.uri());
        config.session.logout_redirect_delay_ms = REDIRECT_DELAY_MS;
        configure(&mut config);

        let store = Arc::new(match &credentials {
            Some(pair) => MemorySessionStore::with_credentials(pair),
            None => MemorySessionStore::in_memory(),
        });
        let navigator = RecordingNavigator::new();
        let client = SessionClient::new(config, store.clone(), Arc::new(navigator.clone()))
            .expect("session client should build");

        Self { server, client, store, navigator }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.store.access_token().await.expect("store readable")
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.store.refresh_token().await.expect("store readable")
    }

    /// Wait past the redirect delay.
    pub async fn settle_redirect(&self) {
        tokio::time::sleep(Duration::from_millis(REDIRECT_DELAY_MS * 4)).await;
    }

    /// Number of requests the mock server saw for `path`.
    pub async fn hits(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }
}
