//! Auth server reached over the portal transport.
//!
//! Calls go straight to the transport, never through the gateway, so a
//! failing refresh can not trigger another refresh.

use std::sync::Arc;

use async_trait::async_trait;
use portal_application::ports::{AuthServer, Credentials, HttpClient};
use portal_domain::{AccessToken, ApiRequest, ApiResponse, AuthError, RequestBody};
use serde::Deserialize;
use tracing::debug;

const LOGIN_PATH: &str = "auth/login";
const REFRESH_PATH: &str = "auth/refresh";
const LOGOUT_PATH: &str = "auth/logout";

/// Body of a successful `auth/login` or `auth/refresh`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

/// [`AuthServer`] speaking the portal's `auth/*` endpoints.
///
/// Must share its transport (and so its cookie jar) with the gateway.
#[derive(Clone)]
pub struct HttpAuthServer {
    http: Arc<dyn HttpClient>,
}

impl HttpAuthServer {
    /// Creates an auth server client over `http`.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn post(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let response = self
            .http
            .execute(&request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(rejected(&response));
        }
        Ok(response)
    }
}

fn rejected(response: &ApiResponse) -> AuthError {
    let message = response
        .error_body()
        .map_or_else(|| format!("HTTP {}", response.status), |body| body.message());
    AuthError::Rejected {
        status: response.status,
        message,
    }
}

fn token_from(response: &ApiResponse) -> Result<AccessToken, AuthError> {
    let parsed: TokenResponse = response
        .json()
        .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

    if let Some(token_type) = parsed.token_type.as_deref()
        && !token_type.eq_ignore_ascii_case("bearer")
    {
        return Err(AuthError::InvalidResponse(format!(
            "unsupported token type: {token_type}"
        )));
    }

    match parsed.access_token {
        Some(token) if !token.trim().is_empty() => Ok(AccessToken::new(token.trim())),
        _ => Err(AuthError::MissingToken),
    }
}

#[async_trait]
impl AuthServer for HttpAuthServer {
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let request = ApiRequest::post(LOGIN_PATH).with_body(RequestBody::form([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]));
        let response = self.post(request).await?;
        token_from(&response)
    }

    async fn refresh(&self) -> Result<AccessToken, AuthError> {
        debug!("exchanging refresh cookie for a new access token");
        let response = self.post(ApiRequest::post(REFRESH_PATH)).await?;
        token_from(&response)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post(ApiRequest::post(LOGOUT_PATH)).await.map(|_| ())
    }
}

impl std::fmt::Debug for HttpAuthServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthServer").finish_non_exhaustive()
    }
}
