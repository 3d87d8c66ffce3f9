//! Auth server port.

use std::fmt;

use async_trait::async_trait;
use portal_domain::{AccessToken, AuthError};

/// Login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username (the account email).
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The external service that issues, refreshes and revokes access tokens.
///
/// The refresh session is an httpOnly cookie owned by the transport; callers
/// never see it.
#[async_trait]
pub trait AuthServer: Send + Sync {
    /// Exchanges credentials for an access token.
    async fn login(&self, credentials: &Credentials) -> Result<AccessToken, AuthError>;

    /// Exchanges the refresh cookie for a new access token.
    async fn refresh(&self) -> Result<AccessToken, AuthError>;

    /// Revokes the refresh session.
    async fn logout(&self) -> Result<(), AuthError>;
}
