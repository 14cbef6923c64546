use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::blob_store::{sanitize, BlobStoreError};
use crate::AppState;

/// The single-page gallery UI.
/// Route: GET /
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../assets/index.html"))
}

/// Serve uploaded image bytes.
/// Route: GET /uploads/*file
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(file): axum::extract::Path<String>,
) -> Result<Response, ApiError> {
    // Wildcard captures may contain separators; the stored name is always the
    // final segment
    let key = sanitize(&file);

    let data = state.blobs.read(key).await.map_err(|e| match e {
        BlobStoreError::NotFound(_) => ApiError::not_found("File not found"),
        _ => ApiError::internal(format!("Failed to retrieve file: {e}")),
    })?;

    // Build response with appropriate headers
    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        mime_guess::from_path(key)
            .first_or_octet_stream()
            .as_ref()
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    // Cache for 1 hour (uploads are immutable once written, only the record
    // metadata changes)
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}
