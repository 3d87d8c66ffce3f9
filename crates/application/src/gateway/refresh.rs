//! Single-flight token refresh.

use std::time::Duration;

use parking_lot::Mutex;
use portal_domain::{AccessToken, AuthError};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::auth::TokenStore;
use crate::ports::AuthServer;

/// Continuations parked behind an in-flight refresh, in arrival order.
#[derive(Debug, Default)]
struct PendingQueue(Vec<oneshot::Sender<()>>);

impl PendingQueue {
    fn push(&mut self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.0.push(tx);
        rx
    }

    fn drain(&mut self) -> usize {
        let waiters = std::mem::take(&mut self.0);
        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away has nothing left to wake.
            let _ = waiter.send(());
        }
        released
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    pending: PendingQueue,
}

/// Resets the coordinator when the leader settles, including when the
/// leader's future is dropped mid-refresh.
struct SettleGuard<'a> {
    state: &'a Mutex<RefreshState>,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.refreshing = false;
        let released = state.pending.drain();
        if released > 0 {
            debug!(released, "released requests waiting on token refresh");
        }
    }
}

enum Ticket {
    Leader,
    Follower(oneshot::Receiver<()>),
}

/// Ensures at most one refresh call is in flight per gateway.
///
/// The first caller becomes the leader and talks to the auth server; callers
/// arriving while it runs are queued and re-read the token store once the
/// leader has stored its outcome.
#[derive(Debug)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    timeout: Duration,
}

impl RefreshCoordinator {
    /// Creates an idle coordinator whose refresh calls are bounded by
    /// `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: Mutex::new(RefreshState::default()),
            timeout,
        }
    }

    /// Returns true while a refresh call is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of callers waiting on the in-flight refresh.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.lock().pending.0.len()
    }

    /// Obtains a new access token, joining an in-flight refresh if there is
    /// one.
    ///
    /// On success the new token is in `tokens` before any waiter is released.
    /// On failure or timeout `tokens` is cleared and `None` returned.
    pub async fn refresh(&self, auth: &dyn AuthServer, tokens: &TokenStore) -> Option<AccessToken> {
        let ticket = {
            let mut state = self.state.lock();
            if state.refreshing {
                Ticket::Follower(state.pending.push())
            } else {
                state.refreshing = true;
                Ticket::Leader
            }
        };

        match ticket {
            Ticket::Leader => self.lead(auth, tokens).await,
            Ticket::Follower(released) => {
                debug!("waiting for in-flight token refresh");
                // A dropped sender also means the refresh has settled.
                let _ = released.await;
                tokens.get().await
            }
        }
    }

    async fn lead(&self, auth: &dyn AuthServer, tokens: &TokenStore) -> Option<AccessToken> {
        let settle = SettleGuard { state: &self.state };

        let result = tokio::time::timeout(self.timeout, auth.refresh())
            .await
            .unwrap_or_else(|_| Err(AuthError::Timeout(self.timeout.as_secs())));

        let token = match result {
            Ok(token) => {
                info!(token = %token.preview(), "access token refreshed");
                Some(token)
            }
            Err(error) => {
                warn!(%error, "token refresh failed, ending session");
                None
            }
        };

        tokens.set(token.clone()).await;
        drop(settle);
        token
    }
}
