//! Shared test helpers for photo-gallery handler tests.

use std::sync::Arc;

use crate::blob_store::LocalBlobStore;
use crate::config::Config;
use crate::store::PhotoStore;
use crate::AppState;

/// Create a test AppState with a temporary data file and upload directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    test_state_with_max_upload(temp_dir, 10 * 1024 * 1024) // 10MB for tests
}

/// Like [`test_state`], but with a caller-chosen upload size limit.
pub fn test_state_with_max_upload(
    temp_dir: &tempfile::TempDir,
    max_upload_size: u64,
) -> Arc<AppState> {
    let data_file = temp_dir.path().join("data.json");
    let upload_dir = temp_dir.path().join("uploads");

    let config = Config {
        bind_address: "127.0.0.1:0".to_string(),
        data_file: data_file.to_string_lossy().to_string(),
        upload_dir: upload_dir.to_string_lossy().to_string(),
        max_upload_size,
        test_mode: true,
    };

    let store = PhotoStore::open(&data_file).expect("Failed to open test record store");
    let blobs = LocalBlobStore::new(&upload_dir).expect("Failed to create test blob store");

    Arc::new(AppState {
        config,
        store,
        blobs: Arc::new(blobs),
    })
}
