//! Token storage in a single plain-text file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use portal_application::ports::{FileSystem, TokenStorage, TokenStorageError};
use tracing::debug;

/// Keeps the access token in one file; a missing file means logged-out.
///
/// Saves replace the file atomically, so a crash never leaves a truncated
/// token behind.
#[derive(Debug, Clone)]
pub struct FileTokenStorage<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileTokenStorage<F> {
    /// Creates a storage slot at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Location of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: FileSystem> TokenStorage for FileTokenStorage<F> {
    async fn load(&self) -> Result<Option<String>, TokenStorageError> {
        let raw = self.fs.read_optional(&self.path).await?;
        Ok(raw
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string))
    }

    async fn save(&self, token: &str) -> Result<(), TokenStorageError> {
        self.fs.replace(&self.path, token.as_bytes()).await?;
        debug!(path = %self.path.display(), "access token saved");
        Ok(())
    }

    async fn remove(&self) -> Result<(), TokenStorageError> {
        if self.fs.remove_if_exists(&self.path).await? {
            debug!(path = %self.path.display(), "access token file removed");
        }
        Ok(())
    }
}
