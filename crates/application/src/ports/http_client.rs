//! HTTP Client port

use async_trait::async_trait;
use portal_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Transport failures: no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be built from the base URL and path.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Any other transport error.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests against the portal API.
///
/// Implementations resolve `request.path` against the API base URL and send
/// credentialed requests (the refresh cookie travels with every call).
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError>;
}
