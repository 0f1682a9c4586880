//! Artifact storage for document-producing handlers.
//!
//! Generated documents are stored outside the run's result data; a node's
//! output string only carries the location. Implementations provide the
//! actual backend (filesystem here; anything else behind the same trait).

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Storage backend for generated documents.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
  /// Persist the bytes under the given file name and return the location
  /// a caller can retrieve the artifact from.
  async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ArtifactError>;
}

/// Filesystem-backed artifact store.
///
/// Stores each artifact at `{base_dir}/{file_name}`; the directory is
/// created on first write.
pub struct FsArtifactStore {
  base_dir: PathBuf,
}

impl FsArtifactStore {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
  async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ArtifactError> {
    fs::create_dir_all(&self.base_dir).await?;
    let path = self.base_dir.join(file_name);
    fs::write(&path, bytes).await?;
    Ok(path)
  }
}
