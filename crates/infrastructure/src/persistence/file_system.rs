//! File system adapter on `tokio::fs`.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use portal_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

fn classify(path: &Path, source: std::io::Error) -> FileSystemError {
    if source.kind() == ErrorKind::PermissionDenied {
        FileSystemError::PermissionDenied(path.to_path_buf())
    } else {
        FileSystemError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `token` -> `token.tmp`, in the same directory so the rename stays on one
/// file system.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl FileSystem for TokioFileSystem {
    async fn read_optional(&self, path: &Path) -> Result<Option<String>, FileSystemError> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(classify(path, e)),
        }
    }

    async fn replace(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(|e| classify(dir, e))?;
        }
        let staging = staging_path(path);
        fs::write(&staging, contents).await.map_err(|e| classify(&staging, e))?;
        fs::rename(&staging, path).await.map_err(|e| classify(path, e))
    }

    async fn remove_if_exists(&self, path: &Path) -> Result<bool, FileSystemError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(classify(path, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("/home/ana/.config/coop-portal/token")),
            PathBuf::from("/home/ana/.config/coop-portal/token.tmp")
        );
    }

    #[tokio::test]
    async fn test_replace_creates_parent_dirs_and_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/token");

        TokioFileSystem.replace(&path, b"abc").await.unwrap();
        TokioFileSystem.replace(&path, b"xyz").await.unwrap();

        assert_eq!(TokioFileSystem.read_optional(&path).await.unwrap().as_deref(), Some("xyz"));
        assert!(!staging_path(&path).exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent");

        assert_eq!(TokioFileSystem.read_optional(&path).await.unwrap(), None);
        assert!(!TokioFileSystem.remove_if_exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_reading_a_directory_fails() {
        let dir = tempdir().unwrap();
        assert!(TokioFileSystem.read_optional(dir.path()).await.is_err());
    }
}
