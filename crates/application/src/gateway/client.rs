//! The gateway send loop.

use std::sync::Arc;
use std::time::Duration;

use portal_domain::{AccessToken, ApiRequest, ApiResponse, jwt};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::RefreshCoordinator;
use crate::auth::TokenStore;
use crate::error::{GatewayError, GatewayResult};
use crate::ports::{AuthServer, Clock, HttpClient};

/// Default bound on a single refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Upper bound on one refresh call; hitting it counts as a failed refresh.
    pub refresh_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }
}

/// Whether a logical request has already been retried after a 401.
///
/// Threaded through the send loop by value; requests themselves are never
/// marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryContext {
    retried: bool,
}

impl RetryContext {
    /// Context for the first attempt.
    #[must_use]
    pub const fn first() -> Self {
        Self { retried: false }
    }

    /// Returns true if the request was already retried once.
    #[must_use]
    pub const fn is_retry(self) -> bool {
        self.retried
    }

    /// Context for the retry attempt.
    #[must_use]
    pub const fn retried(self) -> Self {
        Self { retried: true }
    }
}

/// Sends requests with the current bearer token and recovers from expired
/// or rejected tokens through one shared refresh.
pub struct Gateway {
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn AuthServer>,
    tokens: Arc<TokenStore>,
    clock: Arc<dyn Clock>,
    refresh: RefreshCoordinator,
}

impl Gateway {
    /// Creates a gateway over the given transport and auth server.
    #[must_use]
    pub fn new(
        http: Arc<dyn HttpClient>,
        auth: Arc<dyn AuthServer>,
        tokens: Arc<TokenStore>,
        clock: Arc<dyn Clock>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            http,
            auth,
            tokens,
            clock,
            refresh: RefreshCoordinator::new(config.refresh_timeout),
        }
    }

    /// Token store the gateway reads from.
    #[must_use]
    pub const fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Refresh coordinator shared by all requests through this gateway.
    #[must_use]
    pub const fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// Sends `request` and returns the 2xx response.
    ///
    /// An expired token is refreshed before sending. A 401 triggers one
    /// refresh and one retry; a second 401 is final.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Network`] if no response was received
    /// - [`GatewayError::Unauthorized`] with the original 401 if refreshing
    ///   failed or the retry was rejected too
    /// - [`GatewayError::Api`] for any other non-2xx status
    pub async fn send(&self, request: &ApiRequest) -> GatewayResult<ApiResponse> {
        let mut token = self.outbound_token().await;
        let mut context = RetryContext::first();

        loop {
            debug!(
                method = %request.method,
                path = %request.path_and_query(),
                authorized = token.is_some(),
                retry = context.is_retry(),
                "sending request"
            );
            let response = self.http.execute(&request.authorized(token.as_ref())).await?;

            if !response.is_unauthorized() {
                if response.is_success() {
                    return Ok(response);
                }
                return Err(GatewayError::api(&response));
            }

            if context.is_retry() {
                warn!(path = %request.path, "request rejected after token refresh");
                return Err(GatewayError::unauthorized(&response));
            }
            context = context.retried();

            debug!(path = %request.path, "401 received, refreshing access token");
            match self.refresh.refresh(self.auth.as_ref(), &self.tokens).await {
                Some(fresh) => token = Some(fresh),
                None => return Err(GatewayError::unauthorized(&response)),
            }
        }
    }

    /// Sends `request` and decodes the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// Returns the [`send`](Self::send) errors, or [`GatewayError::Decode`] if
    /// the body does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> GatewayResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .map_err(|e| GatewayError::Decode(format!("{}: {e}", request.path)))
    }

    /// Token to attach before the first attempt, refreshing it if expired.
    async fn outbound_token(&self) -> Option<AccessToken> {
        let token = self.tokens.get().await?;
        if !jwt::is_expired(&token, self.clock.now()) {
            return Some(token);
        }

        debug!(token = %token.preview(), "access token expired, refreshing before send");
        self.refresh.refresh(self.auth.as_ref(), &self.tokens).await
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("tokens", &self.tokens)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}
