use axum::extract::{Multipart, State};
use axum::Json;
use bytes::BytesMut;
use chrono::{Local, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{Ack, ApiError, AppJson, PhotoEnvelope};
use crate::blob_store::sanitize;
use crate::store::models::{Photo, PhotoPatch};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DeletePhotoRequest {
    pub id: i64,
    pub src: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePhotoRequest {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub date: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/photos: the raw record array, newest first.
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let photos = state
        .store
        .list()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(photos))
}

/// POST /api/photos: multipart upload with `file`, `title`, and `author`
/// fields.
pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PhotoEnvelope>, ApiError> {
    let mut file_data: Option<BytesMut> = None;
    let mut file_name: Option<String> = None;
    let mut title: Option<String> = None;
    let mut author: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                let mut buf = BytesMut::with_capacity(data.len());
                buf.extend_from_slice(&data);
                file_data = Some(buf);
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid title: {e}")))?,
                );
            }
            "author" => {
                author = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid author: {e}")))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::bad_request("file field is required"))?;
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("title field is required"))?;
    let author = author
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());

    // Phase 1: write the bytes under a collision-free stored name
    let key = state
        .blobs
        .save(file_name.as_deref().unwrap_or("upload"), file_data.freeze())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store file: {e}")))?;

    // Phase 2: prepend the record to the data file
    let photo = Photo {
        id: Utc::now().timestamp_millis(),
        title,
        author,
        src: format!("/uploads/{key}"),
        date: Local::now().format("%-m/%-d/%Y").to_string(),
    };

    if let Err(e) = state.store.append(&photo) {
        // Best-effort cleanup of the uploaded blob
        let _ = state.blobs.delete(&key).await;
        return Err(ApiError::internal(e.to_string()));
    }

    tracing::debug!(photo_id = photo.id, src = %photo.src, "Created photo");

    Ok(PhotoEnvelope::ok(photo))
}

/// PUT /api/photos: edit title/author/date in place; `src` is preserved.
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<UpdatePhotoRequest>,
) -> Result<Json<PhotoEnvelope>, ApiError> {
    let patch = PhotoPatch {
        title: req.title,
        author: req.author,
        date: req.date,
    };

    let photo = state
        .store
        .replace(req.id, &patch)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    tracing::debug!(photo_id = photo.id, "Updated photo");

    Ok(PhotoEnvelope::ok(photo))
}

/// DELETE /api/photos: remove the record and unlink its upload best-effort.
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<DeletePhotoRequest>,
) -> Result<Json<Ack>, ApiError> {
    state
        .store
        .remove(req.id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    // The stored name is the final segment of the record's src
    let key = sanitize(&req.src);
    if let Err(e) = state.blobs.delete(key).await {
        tracing::warn!(photo_id = req.id, error = %e, "Failed to delete uploaded file");
    }

    tracing::debug!(photo_id = req.id, "Deleted photo");

    Ok(Ack::ok())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_state, test_state_with_max_upload};
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;

    const BOUNDARY: &str = "photo-form-boundary";

    /// Build a `Multipart` extractor from (name, optional filename, data)
    /// form fields.
    async fn upload_form(fields: &[(&str, Option<&str>, &[u8])]) -> Multipart {
        let mut body = Vec::new();
        for (name, file_name, data) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(f) => {
                    format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\r\n")
                }
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    fn seed_photo(state: &Arc<AppState>, id: i64, title: &str) -> Photo {
        let photo = Photo {
            id,
            title: title.to_string(),
            author: "Ada".to_string(),
            src: format!("/uploads/{id}-seed.png"),
            date: "1/2/2026".to_string(),
        };
        state.store.append(&photo).unwrap();
        photo
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        seed_photo(&state, 1, "first");
        seed_photo(&state, 2, "second");

        let Json(photos) = list_photos(State(state)).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].id, 2);
        assert_eq!(photos[1].id, 1);
    }

    #[tokio::test]
    async fn update_preserves_src() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let original = seed_photo(&state, 10, "before");

        let req = UpdatePhotoRequest {
            id: 10,
            title: "after".to_string(),
            author: "Grace".to_string(),
            date: "3/4/2026".to_string(),
        };
        let Json(envelope) = update_photo(State(Arc::clone(&state)), AppJson(req))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.photo.title, "after");
        assert_eq!(envelope.photo.author, "Grace");
        assert_eq!(envelope.photo.date, "3/4/2026");
        assert_eq!(envelope.photo.src, original.src);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let req = UpdatePhotoRequest {
            id: 999,
            title: "x".to_string(),
            author: "y".to_string(),
            date: "z".to_string(),
        };
        let err = update_photo(State(state), AppJson(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Fail(StatusCode::NOT_FOUND, _)));
    }

    #[tokio::test]
    async fn delete_removes_record_and_blob() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let key = state
            .blobs
            .save("cat.png", Bytes::from_static(b"png bytes"))
            .await
            .unwrap();
        let photo = Photo {
            id: 42,
            title: "cat".to_string(),
            author: "Ada".to_string(),
            src: format!("/uploads/{key}"),
            date: "1/2/2026".to_string(),
        };
        state.store.append(&photo).unwrap();

        let req = DeletePhotoRequest {
            id: 42,
            src: photo.src.clone(),
        };
        let Json(ack) = delete_photo(State(Arc::clone(&state)), AppJson(req))
            .await
            .unwrap();

        assert!(ack.success);
        assert!(state.store.list().unwrap().is_empty());
        assert!(!state.blobs.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn delete_unknown_id_still_acknowledges() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        seed_photo(&state, 1, "keep");

        let req = DeletePhotoRequest {
            id: 2,
            src: "/uploads/2-none.png".to_string(),
        };
        let Json(ack) = delete_photo(State(Arc::clone(&state)), AppJson(req))
            .await
            .unwrap();

        assert!(ack.success);
        assert_eq!(state.store.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_prepends_record_and_stores_blob() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        seed_photo(&state, 1, "existing");

        let form = upload_form(&[
            ("file", Some("cat.png"), b"png bytes"),
            ("title", None, b"Cat"),
            ("author", None, b"Ada"),
        ])
        .await;
        let Json(envelope) = create_photo(State(Arc::clone(&state)), form)
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.photo.title, "Cat");
        assert_eq!(envelope.photo.author, "Ada");
        assert!(envelope.photo.src.starts_with("/uploads/"));
        assert!(envelope.photo.src.ends_with("-cat.png"));

        let photos = state.store.list().unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0], envelope.photo);
        assert_eq!(photos[1].id, 1);

        let key = sanitize(&envelope.photo.src);
        assert_eq!(
            state.blobs.read(key).await.unwrap(),
            Bytes::from_static(b"png bytes")
        );
    }

    #[tokio::test]
    async fn create_requires_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let form = upload_form(&[("title", None, b"Sunset")]).await;
        let err = create_photo(State(Arc::clone(&state)), form)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Fail(StatusCode::BAD_REQUEST, _)));
        assert!(state.store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_requires_nonblank_title() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let form = upload_form(&[
            ("file", Some("cat.png"), b"png bytes"),
            ("title", None, b"   "),
        ])
        .await;
        let err = create_photo(State(Arc::clone(&state)), form)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Fail(StatusCode::BAD_REQUEST, _)));
        assert!(state.store.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_defaults_author_to_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let form = upload_form(&[
            ("file", Some("cat.png"), b"png bytes"),
            ("title", None, b"Cat"),
        ])
        .await;
        let Json(envelope) = create_photo(State(state), form).await.unwrap();

        assert_eq!(envelope.photo.author, "Anonymous");
    }

    #[tokio::test]
    async fn create_rejects_oversized_upload() {
        let dir = tempfile::tempdir().unwrap();
        // Limit below axum's 2MB extractor default so the handler's own
        // size check is what rejects the upload
        let state = test_state_with_max_upload(&dir, 1024);

        // One byte over the 1KB test-state limit
        let oversized = vec![0u8; 1024 + 1];
        let form = upload_form(&[
            ("file", Some("huge.png"), oversized.as_slice()),
            ("title", None, b"Huge"),
        ])
        .await;
        let err = create_photo(State(Arc::clone(&state)), form)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Fail(StatusCode::PAYLOAD_TOO_LARGE, _)
        ));
        assert!(state.store.list().unwrap().is_empty());
    }
}
