use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_size as usize;

    let mut router = Router::new()
        // Gallery UI
        .route("/", get(handlers::index))
        // Photos
        .route("/api/photos", get(handlers::list_photos))
        .route(
            "/api/photos",
            post(handlers::create_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/photos", delete(handlers::delete_photo))
        .route("/api/photos", put(handlers::update_photo))
        // Uploaded content
        .route("/uploads/*file", get(handlers::serve_upload))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled — purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
