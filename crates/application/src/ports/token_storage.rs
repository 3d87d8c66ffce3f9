//! Persistent token storage port

use async_trait::async_trait;

/// Errors that can occur while persisting the access token.
#[derive(Debug, thiserror::Error)]
pub enum TokenStorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage location is unavailable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single persistent slot holding the raw access token.
///
/// Absence of the entry means logged-out. Implementations store the token as
/// a plain string and never inspect it.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Reads the stored token, if any.
    async fn load(&self) -> Result<Option<String>, TokenStorageError>;

    /// Writes the token, replacing any previous value.
    async fn save(&self, token: &str) -> Result<(), TokenStorageError>;

    /// Deletes the entry. Deleting a missing entry is not an error.
    async fn remove(&self) -> Result<(), TokenStorageError>;
}
