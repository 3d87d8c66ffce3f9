//! Gateway error types

use portal_domain::{ApiErrorBody, ApiResponse, DomainError};
use thiserror::Error;

use crate::ports::HttpClientError;

/// Errors surfaced to callers of the gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] HttpClientError),

    /// The server rejected the credentials and refreshing did not help.
    #[error("unauthorized ({status}): {}", .body.message())]
    Unauthorized {
        /// HTTP status of the rejected request.
        status: u16,
        /// Error body of the rejected request.
        body: ApiErrorBody,
    },

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {}", .body.message())]
    Api {
        /// HTTP status.
        status: u16,
        /// Parsed error body; empty if the body was not structured.
        body: ApiErrorBody,
    },

    /// A successful response body did not match the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),
}

impl GatewayError {
    /// Builds the auth error for a 401 response.
    #[must_use]
    pub fn unauthorized(response: &ApiResponse) -> Self {
        Self::Unauthorized {
            status: response.status,
            body: response.error_body().unwrap_or_default(),
        }
    }

    /// Builds the application error for a non-2xx response.
    #[must_use]
    pub fn api(response: &ApiResponse) -> Self {
        Self::Api {
            status: response.status,
            body: response.error_body().unwrap_or_default(),
        }
    }

    /// HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for the auth failure case.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Short message for display, prefixed by the status when there is one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { status, body } | Self::Api { status, body } => {
                format!("{status} {}", body.message())
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
