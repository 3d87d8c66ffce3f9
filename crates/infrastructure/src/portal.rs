//! Wires the adapters into a ready-to-use client.

use std::sync::Arc;

use portal_application::ports::{AuthServer, Clock, HttpClient, HttpClientError, TokenStorage};
use portal_application::{Gateway, GatewayConfig, PortalApi, Session, TokenStore};
use portal_domain::AuthState;
use thiserror::Error;

use crate::adapters::{ReqwestHttpClient, SystemClock};
use crate::auth::HttpAuthServer;
use crate::config::{ConfigError, PortalConfig};
use crate::persistence::{FileTokenStorage, TokioFileSystem};

/// Errors raised while assembling a [`Portal`].
#[derive(Debug, Error)]
pub enum PortalError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP transport could not be created.
    #[error("failed to create HTTP transport: {0}")]
    Transport(#[from] HttpClientError),
}

/// A portal client: session management plus the typed endpoints, sharing
/// one token store and one transport.
#[derive(Debug)]
pub struct Portal {
    session: Session,
    api: PortalApi,
}

impl Portal {
    /// Builds a client talking to the configured server, with the token
    /// persisted at `config.token_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the transport cannot
    /// be created.
    pub fn connect(config: &PortalConfig) -> Result<Self, PortalError> {
        let base_url = config.base_url()?;
        let http = ReqwestHttpClient::new(base_url.as_str(), &config.transport())?;
        let storage = FileTokenStorage::new(TokioFileSystem, config.token_path.clone());

        Ok(Self::from_parts(
            Arc::new(http),
            Arc::new(storage),
            Arc::new(SystemClock),
            config.gateway(),
        ))
    }

    /// Builds a client from explicit adapters. The auth server shares
    /// `http`, and with it the refresh cookie.
    #[must_use]
    pub fn from_parts(
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn TokenStorage>,
        clock: Arc<dyn Clock>,
        config: GatewayConfig,
    ) -> Self {
        let auth: Arc<dyn AuthServer> = Arc::new(HttpAuthServer::new(http.clone()));
        let tokens = Arc::new(TokenStore::new(storage));
        let gateway = Arc::new(Gateway::new(http, auth.clone(), tokens.clone(), clock, config));

        Self {
            session: Session::new(auth, tokens),
            api: PortalApi::new(gateway),
        }
    }

    /// Login, logout and session state.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Typed endpoints.
    #[must_use]
    pub const fn api(&self) -> &PortalApi {
        &self.api
    }

    /// Authenticated request gateway, for endpoints without a typed wrapper.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<Gateway> {
        self.api.gateway()
    }

    /// Signs out and forgets every cached listing.
    pub async fn logout(&self) -> AuthState {
        self.session.logout().await;
        self.api.clear_cache();
        self.session.state()
    }
}
