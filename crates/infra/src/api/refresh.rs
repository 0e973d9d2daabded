//! Single-flight token refresh
//!
//! At most one refresh runs at a time. The first caller to arrive becomes
//! the leader and performs the refresh; everyone arriving while it is in
//! flight parks a oneshot waiter. When the refresh settles the flag is
//! cleared and the waiters are drained in arrival order, all under one lock
//! acquisition, so the queue is never observed non-empty with the flag clear.
//!
//! If the leader is dropped before settling (its caller was cancelled), the
//! waiters are released with [`RefreshError::Abandoned`] and the first of
//! them takes over as the new leader.

use std::collections::VecDeque;
use std::future::Future;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Outcome delivered to every caller of one refresh cycle.
pub type RefreshOutcome = Result<String, RefreshError>;

/// Why a refresh did not produce a new access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Refresh response did not contain an access token")]
    MalformedResponse,

    #[error("Refresh request failed: {0}")]
    Transport(String),

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Refresh abandoned before completion")]
    Abandoned,

    /// The session was logged out or replaced while the refresh ran; the new
    /// token was discarded.
    #[error("Session changed while the refresh was in flight")]
    Superseded,
}

impl RefreshError {
    /// HTTP status returned by the refresh endpoint, if it answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FlightState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

enum Role {
    Leader,
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Coordinates concurrent refresh attempts.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<FlightState>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Number of callers parked behind the in-flight refresh.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Join the current refresh cycle, starting one with `refresh` if none
    /// is in flight. Every participant receives the same outcome.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        loop {
            let receiver = match self.join() {
                Role::Leader => return self.lead(refresh).await,
                Role::Waiter(receiver) => receiver,
            };

            match receiver.await {
                Ok(Err(RefreshError::Abandoned)) | Err(_) => {
                    debug!("refresh leader went away, retrying");
                }
                Ok(outcome) => return outcome,
            }
        }
    }

    fn join(&self) -> Role {
        let mut state = self.state.lock();
        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push_back(sender);
            debug!(queued = state.waiters.len(), "refresh in flight, queueing");
            Role::Waiter(receiver)
        } else {
            state.in_flight = true;
            Role::Leader
        }
    }

    async fn lead<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let mut guard = SettleOnDrop { coordinator: self, armed: true };
        let outcome = refresh().await;
        guard.armed = false;
        self.settle(&outcome);
        outcome
    }

    fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        debug!(waiters = waiters.len(), success = outcome.is_ok(), "refresh settled");
        for waiter in waiters {
            // A waiter whose caller was cancelled has dropped its receiver.
            let _ = waiter.send(outcome.clone());
        }
    }
}

struct SettleOnDrop<'a> {
    coordinator: &'a RefreshCoordinator,
    armed: bool,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.settle(&Err(RefreshError::Abandoned));
        }
    }
}
