//! Process-wide holder of the current access token.
//!
//! The in-memory slot is the source of truth once anything has been set;
//! persistent storage mirrors it so a restarted process picks up the
//! previous session.

use std::sync::Arc;

use portal_domain::{AccessToken, AuthState};
use tokio::sync::{RwLock, watch};
use tracing::{debug, warn};

use crate::ports::TokenStorage;

/// What the in-memory slot knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    /// Storage has not been consulted yet.
    #[default]
    Unloaded,
    /// Explicitly cleared; storage is not consulted again, even if deleting
    /// the stored entry failed.
    Cleared,
    Held(AccessToken),
}

impl Slot {
    fn token(&self) -> Option<AccessToken> {
        match self {
            Self::Held(token) => Some(token.clone()),
            Self::Unloaded | Self::Cleared => None,
        }
    }
}

/// Shared store for the current access token.
///
/// Writes go through one async lock, so memory and storage are updated in
/// the same order and readers never see a token older than the last `set`.
pub struct TokenStore {
    slot: RwLock<Slot>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<AuthState>,
}

impl TokenStore {
    /// Creates an empty store backed by `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::LoggedOut);
        Self {
            slot: RwLock::new(Slot::Unloaded),
            storage,
            state,
        }
    }

    /// Returns the current token.
    ///
    /// Until the first `set`, falls back to persistent storage (cold start).
    /// Storage failures are logged and read as "no token".
    pub async fn get(&self) -> Option<AccessToken> {
        {
            let slot = self.slot.read().await;
            if *slot != Slot::Unloaded {
                return slot.token();
            }
        }

        let mut slot = self.slot.write().await;
        if *slot != Slot::Unloaded {
            return slot.token();
        }

        match self.storage.load().await {
            Ok(Some(raw)) if !raw.trim().is_empty() => {
                let token = AccessToken::new(raw.trim());
                debug!(token = %token.preview(), "restored access token from storage");
                *slot = Slot::Held(token.clone());
                self.state.send_replace(AuthState::from_token(Some(&token)));
                Some(token)
            }
            Ok(_) => None,
            Err(error) => {
                warn!(%error, "failed to read stored access token");
                None
            }
        }
    }

    /// Replaces the current token; `None` clears it.
    ///
    /// Storage is written for `Some` and the entry deleted for `None`. The
    /// token shape is not validated. Storage failures are logged; the
    /// in-memory value still changes and stays authoritative.
    pub async fn set(&self, token: Option<AccessToken>) {
        let mut slot = self.slot.write().await;

        let persisted = match &token {
            Some(token) => self.storage.save(token.as_str()).await,
            None => self.storage.remove().await,
        };
        if let Err(error) = persisted {
            warn!(%error, "failed to persist access token");
        }

        let state = AuthState::from_token(token.as_ref());
        *slot = token.map_or(Slot::Cleared, Slot::Held);
        self.state.send_replace(state);
    }

    /// Clears the current token.
    pub async fn clear(&self) {
        self.set(None).await;
    }

    /// Last published session state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Subscribes to session state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
