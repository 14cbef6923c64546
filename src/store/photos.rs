use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::{Photo, PhotoPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub photos: u64,
}

/// The JSON data file treated as the entire database.
///
/// Every operation loads the whole file, mutates the in-memory array, and
/// serializes it back. There is no partial update, no transaction boundary,
/// and no locking; concurrent writers race and the last writer wins. Accepted
/// for a gallery with a single operator.
#[derive(Clone)]
pub struct PhotoStore {
    path: PathBuf,
}

impl PhotoStore {
    /// Open a store backed by the given file. The file is created lazily on
    /// the first write; a missing file reads as an empty collection.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    fn load(&self) -> Result<Vec<Photo>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn persist(&self, photos: &[Photo]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(photos)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// All photos, newest first
    pub fn list(&self) -> Result<Vec<Photo>, StoreError> {
        self.load()
    }

    /// Store a new record at the front of the collection so listings stay in
    /// reverse-creation order.
    pub fn append(&self, photo: &Photo) -> Result<(), StoreError> {
        debug_assert!(!photo.src.is_empty(), "photo src must not be empty");

        let mut photos = self.load()?;
        photos.insert(0, photo.clone());
        self.persist(&photos)
    }

    /// Remove the record with the given id. Returns whether anything was
    /// removed.
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut photos = self.load()?;
        let before = photos.len();
        photos.retain(|p| p.id != id);

        let removed = photos.len() != before;
        if removed {
            self.persist(&photos)?;
        }
        Ok(removed)
    }

    /// Apply an edit to the record with the given id, keeping its `src`.
    /// Returns the updated record, or `None` if the id is unknown.
    pub fn replace(&self, id: i64, patch: &PhotoPatch) -> Result<Option<Photo>, StoreError> {
        let mut photos = self.load()?;

        let updated = match photos.iter_mut().find(|p| p.id == id) {
            Some(photo) => {
                photo.title = patch.title.clone();
                photo.author = patch.author.clone();
                photo.date = patch.date.clone();
                Some(photo.clone())
            }
            None => None,
        };

        if updated.is_some() {
            self.persist(&photos)?;
        }
        Ok(updated)
    }

    /// Remove every record - for testing only
    pub fn purge(&self) -> Result<PurgeStats, StoreError> {
        let photos = self.load()?;
        let stats = PurgeStats {
            photos: photos.len() as u64,
        };
        self.persist(&[])?;
        Ok(stats)
    }
}
