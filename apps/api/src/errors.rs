use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::qa::QaError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Qa(#[from] QaError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Qa(QaError::Disabled) => {
                (StatusCode::CONFLICT, "QA_DISABLED", QaError::Disabled.to_string())
            }
            AppError::Qa(QaError::Busy) => {
                (StatusCode::CONFLICT, "QA_BUSY", QaError::Busy.to_string())
            }
            AppError::Qa(e) => {
                tracing::error!("Retrieval error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RETRIEVAL_ERROR",
                    "A retrieval error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_maps_to_conflict() {
        let response = AppError::from(QaError::Busy).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_disabled_maps_to_conflict() {
        let response = AppError::from(QaError::Disabled).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_retrieval_error_is_internal() {
        let response = AppError::from(QaError::InvalidWindowSize(0)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
