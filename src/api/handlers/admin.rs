use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::blob_store::sanitize;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub photos_deleted: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Wipe every record and its upload. Registered only in test mode.
pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let photos = state
        .store
        .list()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    for photo in &photos {
        let key = sanitize(&photo.src);
        if let Err(e) = state.blobs.delete(key).await {
            tracing::warn!(photo_id = photo.id, error = %e, "Failed to delete uploaded file");
        }
    }

    let stats = state
        .store
        .purge()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::warn!(photos = stats.photos, "Purged all data");

    Ok(Json(PurgeResponse {
        photos_deleted: stats.photos,
    }))
}
