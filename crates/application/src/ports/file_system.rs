//! Disk access needed by file-backed adapters.

use std::future::Future;
use std::path::{Path, PathBuf};

use super::TokenStorageError;

/// Failure touching a path on disk.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// The process may not read or write the path.
    #[error("access to {0} denied")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure.
    #[error("{path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl From<FileSystemError> for TokenStorageError {
    fn from(error: FileSystemError) -> Self {
        match error {
            FileSystemError::PermissionDenied(path) => {
                Self::Unavailable(format!("permission denied: {}", path.display()))
            }
            FileSystemError::Io { source, .. } => Self::Io(source),
        }
    }
}

/// Minimal file operations. A missing file is a normal outcome here, never
/// an error.
pub trait FileSystem: Send + Sync {
    /// Reads `path` as UTF-8, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read.
    fn read_optional(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<String>, FileSystemError>> + Send;

    /// Replaces the content of `path` so that readers see either the old or
    /// the new bytes, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Fails if the directory or file cannot be written.
    fn replace(&self, path: &Path, contents: &[u8]) -> impl Future<Output = Result<(), FileSystemError>> + Send;

    /// Deletes `path`. Returns whether something was deleted.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be deleted.
    fn remove_if_exists(&self, path: &Path) -> impl Future<Output = Result<bool, FileSystemError>> + Send;
}
