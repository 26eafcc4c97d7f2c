//! Typed API error for HTTP handlers.
//!
//! Converts service errors into HTTP responses with a JSON body and status
//! code. Handlers return `Result<Json<T>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use assetdb_service::ServiceError;
use assetdb_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Renders as `{"error": "message"}`. `Internal` logs the real error
/// server-side and returns a static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: invalid input from caller.
    BadRequest(String),
    /// 404 Not Found: requested asset doesn't exist.
    NotFound(String),
    /// 500 Internal Server Error: details logged, not exposed.
    Internal(anyhow::Error),
    /// 503 Service Unavailable: database unreachable.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::Core(e) => Self::BadRequest(e.to_string()),
            ref e if e.is_transient() => {
                tracing::warn!(error = %e, "transient backend failure");
                Self::ServiceUnavailable("database unavailable".to_owned())
            },
            _ => Self::Internal(err.into()),
        }
    }
}
