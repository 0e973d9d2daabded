//! Session event fan-out
//!
//! Events go to every broadcast subscriber. Session-expired handlers
//! registered with [`SessionNotifier::on_session_expired`] are called
//! synchronously for [`SessionEvent::Expired`], which is where a UI shell
//! raises its transient notification.

use std::sync::Arc;

use parking_lot::RwLock;
use sitedesk_domain::constants::SESSION_EVENT_CAPACITY;
use sitedesk_domain::SessionEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Callback invoked with the user-facing message on forced logout.
pub type SessionExpiredHandler = Arc<dyn Fn(&str) + Send + Sync>;

pub struct SessionNotifier {
    sender: broadcast::Sender<SessionEvent>,
    handlers: RwLock<Vec<SessionExpiredHandler>>,
}

impl SessionNotifier {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, handlers: RwLock::new(Vec::new()) }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn on_session_expired<F>(&self, handler: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    pub fn publish(&self, event: SessionEvent) {
        if let SessionEvent::Expired { message } = &event {
            let handlers = self.handlers.read().clone();
            for handler in handlers {
                handler(message);
            }
        }
        // No subscribers is fine.
        if self.sender.send(event).is_err() {
            trace!("session event dropped, no subscribers");
        }
    }
}

impl Default for SessionNotifier {
    fn default() -> Self {
        Self::new(SESSION_EVENT_CAPACITY)
    }
}

impl std::fmt::Debug for SessionNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionNotifier")
            .field("subscribers", &self.sender.receiver_count())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
