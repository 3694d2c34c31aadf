use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("No track points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("GPX serialization failed: {0}")]
    Xml(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload is missing a numeric version field")]
    MissingVersion,
    #[error("Unsupported payload version {0}")]
    UnsupportedVersion(u64),
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Payload names no tracks")]
    NoTracks,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    #[error("Capture could not be started: {0}")]
    StartFailed(String),
    #[error("Capture could not be finalized: {0}")]
    StopFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("Track not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unprocessable: {0}")]
    Unprocessable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Payload(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Export(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
