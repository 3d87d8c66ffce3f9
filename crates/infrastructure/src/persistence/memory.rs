//! Process-local token storage.

use async_trait::async_trait;
use parking_lot::Mutex;
use portal_application::ports::{TokenStorage, TokenStorageError};

/// Keeps the token for the life of the process only.
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl InMemoryTokenStorage {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn load(&self) -> Result<Option<String>, TokenStorageError> {
        Ok(self.slot.lock().clone())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStorageError> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenStorageError> {
        self.slot.lock().take();
        Ok(())
    }
}
