//! Filesystem blob store for uploaded files.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{BlobStore, BlobStoreError};

/// Public path prefix under which stored blobs are referenced
const PUBLIC_PREFIX: &str = "/uploads";

/// Writes decoded upload payloads into a flat directory.
///
/// Serving the stored files back is someone else's job; this store only
/// writes and hands out the public reference path.
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, BlobStoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| BlobStoreError::Write {
                name: filename.to_string(),
                source,
            })?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| BlobStoreError::Write {
                name: filename.to_string(),
                source,
            })?;
        tracing::debug!("wrote {} byte(s) to {}", bytes.len(), path.display());
        Ok(format!("{PUBLIC_PREFIX}/{filename}"))
    }
}
