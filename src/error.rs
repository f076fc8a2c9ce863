//! Error types for the Cluster anchoring server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::annotations::SerializationError;
use crate::document::HighlightError;
use crate::motivation::MotivationError;
use crate::selectors::SelectorError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Highlight error: {0}")]
    Highlight(#[from] HighlightError),

    #[error("Motivation error: {0}")]
    Motivation(#[from] MotivationError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Selector(e) => (StatusCode::BAD_REQUEST, "invalid_selector", e.to_string()),
            AppError::Serialization(e) => match e {
                SerializationError::Json(inner) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_annotation", inner.to_string())
                }
                _ => (StatusCode::UNPROCESSABLE_ENTITY, "serialization_error", e.to_string()),
            },
            AppError::Highlight(e) => {
                tracing::error!("Highlight error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "highlight_error",
                    "Failed to apply highlights".to_string(),
                )
            }
            AppError::Motivation(e) => (StatusCode::BAD_REQUEST, "invalid_motivation", e.to_string()),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unprocessable("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Serialization(SerializationError::NoTargets),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Selector(SelectorError::InvalidRange { start: 5, end: 1 }),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
