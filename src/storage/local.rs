//! Local filesystem entry store.
//!
//! Stores the cache entry as a single JSON file, written atomically
//! (write to temp, then rename) so a crash mid-write can never leave a
//! half-visible entry behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::cache::CacheEntry;
use crate::error::{AppError, Result};
use crate::storage::EntryStore;

/// File-backed entry store.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read the raw file, returning None if it doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl EntryStore for FileStore {
    async fn load(&self) -> Result<Option<CacheEntry>> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // Unreadable entry is the same as no entry.
                log::warn!("Ignoring corrupted cache file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    async fn save(&self, entry: &CacheEntry) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entry)?;
        self.write_bytes(&bytes).await
    }
}
