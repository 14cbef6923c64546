use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::store::models::Photo;

// ============================================================================
// Success envelopes
// ============================================================================

/// Bare `{"success": true}` acknowledgement (delete).
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Json<Ack> {
        Json(Ack { success: true })
    }
}

/// `{"success": true, "photo": {...}}` envelope (create, update).
#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoEnvelope {
    pub success: bool,
    pub photo: Photo,
}

impl PhotoEnvelope {
    pub fn ok(photo: Photo) -> Json<PhotoEnvelope> {
        Json(PhotoEnvelope {
            success: true,
            photo,
        })
    }
}

// ============================================================================
// Failure envelope
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
}

impl Failure {
    pub fn response(
        status_code: StatusCode,
        message: impl Into<String>,
    ) -> (StatusCode, Json<Failure>) {
        (
            status_code,
            Json(Failure {
                success: false,
                message: message.into(),
            }),
        )
    }
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// A handler error that is either a fail (4xx) or error (5xx).
/// Both serialize as `{"success": false, "message": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Fail(StatusCode, String),
    Error(StatusCode, String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Fail(code, msg) | ApiError::Error(code, msg) => {
                let (status, json) = Failure::response(code, msg);
                (status, json).into_response()
            }
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::NOT_FOUND, message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::PAYLOAD_TOO_LARGE, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}

// ============================================================================
// Custom extractors (reject in the failure-envelope format)
// ============================================================================

/// Drop-in replacement for `axum::Json` that rejects with `{"success": false}`
/// errors.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let message = match rejection {
                    JsonRejection::JsonDataError(err) => {
                        format!("Invalid request body: {}", err.body_text())
                    }
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body".into(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing Content-Type: application/json header".into()
                    }
                    _ => "Failed to read request body".into(),
                };
                Err(ApiError::bad_request(message))
            }
        }
    }
}
