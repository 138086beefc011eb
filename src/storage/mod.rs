//! Storage for downloaded plain-text files
//!
//! Each download becomes one file in a scratch directory, named after the
//! book title plus a `.txt` extension. The file on disk is the only record
//! of a download; nothing is kept in memory afterwards.
//!
//! Titles are used verbatim. A title containing `/` or characters the
//! filesystem rejects yields a path that cannot be written (or one outside
//! the intended file name), and two books with the same title overwrite
//! each other. Both cases surface as normal per-item results.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension appended to every title
pub const TEXT_EXTENSION: &str = "txt";

/// Errors that can occur while writing a downloaded file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Path the failed operation targeted
    pub fn path(&self) -> &Path {
        match self {
            StorageError::Write { path, .. } | StorageError::CreateDir { path, .. } => path,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Writes downloaded text into a fixed directory
#[derive(Debug, Clone)]
pub struct TextStore {
    directory: PathBuf,
}

impl TextStore {
    /// Creates a store rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The scratch directory files are written into
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the scratch directory if it does not exist yet
    pub async fn ensure_directory(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.directory.clone(),
                source,
            })
    }

    /// Path a title is written to
    ///
    /// Plain string concatenation: `Path::join` would let an absolute-looking
    /// title replace the directory entirely.
    pub fn path_for(&self, title: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}/{}.{}",
            self.directory.display(),
            title,
            TEXT_EXTENSION
        ))
    }

    /// Writes `content` byte-for-byte, replacing any existing file
    pub async fn persist(&self, title: &str, content: &[u8]) -> StorageResult<PathBuf> {
        let path = self.path_for(title);
        match tokio::fs::write(&path, content).await {
            Ok(()) => Ok(path),
            Err(source) => Err(StorageError::Write { path, source }),
        }
    }
}
