use serde::{Deserialize, Serialize};

/// A photo record stored in the JSON data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Creation timestamp in milliseconds; unique and stable for the photo's
    /// lifetime.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Path to the uploaded file, e.g. `/uploads/1756600000000-cat.jpg`.
    /// Immutable after creation.
    pub src: String,
    /// Display date string, e.g. `8/31/2026`
    pub date: String,
}

/// The fields an edit is allowed to change. `src` is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoPatch {
    pub title: String,
    pub author: String,
    pub date: String,
}
