//! Local filesystem snapshot store.
//!
//! One durable JSON document holding the full snapshot. Writes go to a
//! temp file first and are renamed into place, so an interrupted write
//! never corrupts the previous document.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Snapshot store backed by a single JSON file.
#[derive(Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a store writing to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The durable document path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Ensure the parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
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

    /// Read the raw document, returning None if it doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self) -> Result<Snapshot> {
        match self.read_bytes().await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(snapshot) => Ok(snapshot),
                Err(e) => {
                    log::warn!(
                        "Snapshot at {} is unreadable ({}), starting from empty state",
                        self.path.display(),
                        e
                    );
                    Ok(Snapshot::new())
                }
            },
            Ok(None) => {
                log::info!("No snapshot at {}, starting fresh", self.path.display());
                Ok(Snapshot::new())
            }
            Err(e) => {
                log::warn!(
                    "Failed to read snapshot at {} ({}), starting from empty state",
                    self.path.display(),
                    e
                );
                Ok(Snapshot::new())
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await
    }
}
