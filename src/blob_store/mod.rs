mod local;

pub use local::LocalBlobStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Blob not found: {0}")]
    NotFound(String),
}

/// Abstraction over upload storage.
/// Keys are stored file names; a record's `src` is `/uploads/<key>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write bytes under a timestamp-prefixed name derived from
    /// `suggested_name` and return the stored name.
    async fn save(&self, suggested_name: &str, data: Bytes) -> Result<String, BlobStoreError>;
    async fn read(&self, key: &str) -> Result<Bytes, BlobStoreError>;
    /// Best-effort: deleting a missing blob is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;
}

/// Reduce a client-supplied file name to its final path segment so it cannot
/// escape the upload root.
pub fn sanitize(name: &str) -> &str {
    let segment = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if segment.is_empty() {
        "upload"
    } else {
        segment
    }
}
