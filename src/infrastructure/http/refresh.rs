//! Single-flight refresh of the access token.
//!
//! The first request that needs a new access token becomes the leader: it
//! marks a refresh as in flight and starts the exchange. Every request that
//! needs one while the exchange is running joins the pending queue. When the
//! exchange settles, the same outcome is delivered to every queued request
//! and the in-flight flag is cleared in the same critical section.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

use super::RefreshExchange;
use crate::domain::auth::{RefreshError, RefreshTokenResponse};
use crate::infrastructure::navigation::Navigator;
use crate::infrastructure::storage::{TokenKey, TokenStore};

pub type RefreshOutcome = Result<String, RefreshError>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    pending: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Result of [`RefreshCoordinator::begin_or_join`]
pub enum RefreshTicket {
    /// No refresh was running; the holder must run the exchange and settle the lease
    Leader {
        lease: RefreshLease,
        outcome: oneshot::Receiver<RefreshOutcome>,
    },
    /// A refresh is already running; wait for its outcome
    Follower {
        outcome: oneshot::Receiver<RefreshOutcome>,
    },
}

impl RefreshTicket {
    pub fn is_leader(&self) -> bool {
        matches!(self, RefreshTicket::Leader { .. })
    }
}

/// Right to settle the in-flight refresh.
///
/// Dropping an unsettled lease settles every waiter with
/// `RefreshError::Abandoned`, so the in-flight flag cannot outlive the leader.
pub struct RefreshLease {
    coordinator: Arc<RefreshCoordinator>,
    settled: bool,
}

impl RefreshLease {
    /// Deliver `outcome` to every waiter and clear the in-flight flag.
    /// Returns the number of waiters notified.
    pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Refresh lease dropped before settling");
            self.coordinator.settle(Err(RefreshError::Abandoned));
        }
    }
}

/// Owns the refresh state for one client session
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    exchange: Arc<dyn RefreshExchange>,
    token_store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    exchanges: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(
        exchange: Arc<dyn RefreshExchange>,
        token_store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            exchange,
            token_store,
            navigator,
            login_route: login_route.into(),
            exchanges: AtomicU64::new(0),
        }
    }

    /// Start a refresh, or join the one already in flight
    pub fn begin_or_join(self: &Arc<Self>) -> RefreshTicket {
        let (tx, outcome) = oneshot::channel();

        let mut state = self.state.lock();
        state.pending.push(tx);

        if state.in_flight {
            tracing::debug!(waiters = state.pending.len(), "Joined in-flight refresh");
            return RefreshTicket::Follower { outcome };
        }

        state.in_flight = true;
        tracing::debug!("Starting token refresh");

        RefreshTicket::Leader {
            lease: RefreshLease {
                coordinator: Arc::clone(self),
                settled: false,
            },
            outcome,
        }
    }

    /// Obtain a fresh access token, sharing one exchange between concurrent callers.
    ///
    /// The exchange runs on its own task so a caller that goes away does not
    /// strand the others.
    pub async fn refresh(self: &Arc<Self>) -> RefreshOutcome {
        let outcome = match self.begin_or_join() {
            RefreshTicket::Leader { lease, outcome } => {
                let coordinator = Arc::clone(self);
                tokio::spawn(async move {
                    let result = coordinator.perform_exchange().await;
                    lease.settle(result);
                });
                outcome
            }
            RefreshTicket::Follower { outcome } => outcome,
        };

        outcome.await.unwrap_or(Err(RefreshError::Abandoned))
    }

    /// Run one exchange against the backend and apply its side effects.
    ///
    /// Success persists the new access token (and a rotated refresh token).
    /// Failure clears both tokens and navigates to the login route.
    async fn perform_exchange(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.token_store.refresh_token() else {
            tracing::warn!("Refresh requested without a stored refresh token");
            self.end_session();
            return Err(RefreshError::MissingRefreshToken);
        };

        self.exchanges.fetch_add(1, Ordering::Relaxed);

        let result = match self.exchange.exchange(&refresh_token).await {
            Ok(reply) => self.persist(&reply).map(|()| reply.access_token),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => tracing::info!("Access token refreshed"),
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                self.end_session();
            }
        }

        result
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Requests currently waiting on the in-flight refresh, leader included
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Number of exchanges sent to the backend so far
    pub fn exchanges_sent(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.pending)
        };

        let count = waiters.len();
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        tracing::debug!(waiters = count, success = outcome.is_ok(), "Refresh settled");
        count
    }

    fn persist(&self, reply: &RefreshTokenResponse) -> Result<(), RefreshError> {
        self.token_store
            .set(TokenKey::AuthToken, &reply.access_token)
            .map_err(|e| RefreshError::Storage(e.to_string()))?;

        if let Some(rotated) = &reply.refresh_token {
            self.token_store
                .set(TokenKey::RefreshToken, rotated)
                .map_err(|e| RefreshError::Storage(e.to_string()))?;
        }

        Ok(())
    }

    fn end_session(&self) {
        if let Err(e) = self.token_store.clear() {
            tracing::error!(error = %e, "Failed to clear stored tokens");
        }
        self.navigator.navigate(&self.login_route);
    }
}
