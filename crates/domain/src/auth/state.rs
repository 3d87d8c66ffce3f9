//! Session state published to UI-facing subscribers.

use super::{AccessToken, Role};

/// Whether a user is signed in, as far as the client can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No access token is held.
    #[default]
    LoggedOut,
    /// An access token is held.
    LoggedIn {
        /// Role hint from the token, if it carries a known one.
        role: Option<Role>,
    },
}

impl AuthState {
    /// Derives the state from the current token.
    #[must_use]
    pub fn from_token(token: Option<&AccessToken>) -> Self {
        token.map_or(Self::LoggedOut, |t| Self::LoggedIn {
            role: Role::from_token(t.as_str()),
        })
    }

    /// Returns true when a token is held.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }

    /// Role hint, if logged in.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::LoggedIn { role } => *role,
            Self::LoggedOut => None,
        }
    }
}
