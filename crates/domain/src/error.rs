//! Errors raised while building requests and parsing user input.

use thiserror::Error;

/// Invalid input rejected before anything reaches the network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Verb the portal does not route.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Payload that does not serialize to JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Upload form that the server would reject.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Not one of the document repositories.
    #[error("unknown file type: {0}")]
    UnknownFileType(String),
}

/// Shorthand for fallible domain constructors.
pub type DomainResult<T> = Result<T, DomainError>;
