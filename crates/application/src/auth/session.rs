//! Login, logout and session state.

use std::sync::Arc;

use portal_domain::{AuthError, AuthState, Role};
use tokio::sync::watch;
use tracing::{info, warn};

use super::TokenStore;
use crate::ports::{AuthServer, Credentials};

/// Session manager shared by everything that needs the signed-in state.
///
/// Create one per process and hand out clones of the `Arc`s it was built
/// from; the gateway uses the same [`TokenStore`].
pub struct Session {
    auth: Arc<dyn AuthServer>,
    tokens: Arc<TokenStore>,
}

impl Session {
    /// Creates a session manager.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthServer>, tokens: Arc<TokenStore>) -> Self {
        Self { auth, tokens }
    }

    /// Loads a persisted token, if any, and returns the resulting state.
    pub async fn restore(&self) -> AuthState {
        let token = self.tokens.get().await;
        AuthState::from_token(token.as_ref())
    }

    /// Signs in and stores the issued access token.
    ///
    /// # Errors
    ///
    /// Returns the auth server's error; the stored token is left unchanged.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthState, AuthError> {
        let token = self.auth.login(credentials).await?;
        let state = AuthState::from_token(Some(&token));
        self.tokens.set(Some(token)).await;
        info!(username = %credentials.username, role = ?state.role(), "logged in");
        Ok(state)
    }

    /// Signs out.
    ///
    /// Local state is cleared first, so the client is logged out no matter
    /// what the server does. The revoke call is best-effort and its failure
    /// is only logged.
    pub async fn logout(&self) {
        self.tokens.clear().await;
        match self.auth.logout().await {
            Ok(()) => info!("logged out"),
            Err(error) => warn!(%error, "logout request failed, local session cleared"),
        }
    }

    /// Returns true when an access token is held.
    pub async fn is_logged_in(&self) -> bool {
        self.tokens.get().await.is_some()
    }

    /// Role hint of the held token, for deciding what to display.
    ///
    /// Never use this to authorize anything; the server decides.
    pub async fn current_role(&self) -> Option<Role> {
        let token = self.tokens.get().await?;
        Role::from_token(token.as_str())
    }

    /// Last published session state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.tokens.state()
    }

    /// Subscribes to session state changes (login, logout, refresh failure).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tokens.subscribe()
    }

    /// The token store backing this session.
    #[must_use]
    pub const fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
