use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::models::proposal::UnsupportedDiagramType;

/// A single rejected field in a request body, addressed by dotted path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Unsupported diagram type: {0}")]
    UnsupportedDiagramType(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Request timed out")]
    Timeout,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<UnsupportedDiagramType> for AppError {
    fn from(e: UnsupportedDiagramType) -> Self {
        AppError::UnsupportedDiagramType(e.0)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "The request failed validation".to_string(),
            ),
            AppError::UnsupportedDiagramType(kind) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_DIAGRAM_TYPE",
                format!("Unsupported diagram type '{kind}'"),
            ),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "The document could not be generated. Please try again later.".to_string(),
                )
            }
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "The request took too long to complete".to_string(),
            ),
        };

        let body = match &self {
            AppError::Validation(fields) => json!({
                "error": {
                    "code": code,
                    "message": message,
                    "fields": fields
                }
            }),
            _ => json!({
                "error": {
                    "code": code,
                    "message": message
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}
