//! Authentication errors.

use thiserror::Error;

/// Errors returned by the auth server operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The server rejected the credentials or refresh cookie.
    #[error("authentication rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the server.
        status: u16,
        /// Server-provided detail.
        message: String,
    },

    /// The server answered successfully but without a usable token.
    #[error("token response missing access_token")]
    MissingToken,

    /// The server response could not be parsed.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The refresh call did not settle in time.
    #[error("token refresh timed out after {0}s")]
    Timeout(u64),
}
