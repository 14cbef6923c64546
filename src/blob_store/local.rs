use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::{sanitize, BlobStore, BlobStoreError};

/// Local filesystem blob store rooted at the upload directory.
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn save(&self, suggested_name: &str, data: Bytes) -> Result<String, BlobStoreError> {
        // Prefix with the creation timestamp so repeated uploads of the same
        // file name do not overwrite each other.
        let key = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize(suggested_name)
        );
        tokio::fs::write(self.blob_path(&key), &data).await?;
        Ok(key)
    }

    async fn read(&self, key: &str) -> Result<Bytes, BlobStoreError> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Err(BlobStoreError::NotFound(key.to_string()));
        }
        let data = tokio::fs::read(&path).await?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        let path = self.blob_path(key);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let path = self.blob_path(key);
        Ok(path.exists())
    }
}
