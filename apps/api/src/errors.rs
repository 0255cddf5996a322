use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::extraction::models::DocumentKind;
use crate::extraction::parser::ParseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input missing: {0}")]
    InputMissing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not read {kind} document: {message}")]
    DocumentLoad { kind: DocumentKind, message: String },

    #[error("Text generation service unavailable for {kind} document: {message}")]
    ServiceUnavailable { kind: DocumentKind, message: String },

    #[error("Model reply for {kind} document is not parseable: {error}")]
    Parse { kind: DocumentKind, error: ParseError },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InputMissing(_) => "INPUT_MISSING",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DocumentLoad { .. } => "DOCUMENT_UNREADABLE",
            AppError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            AppError::Parse { .. } => "MODEL_OUTPUT_UNPARSEABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InputMissing(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DocumentLoad { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Parse { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let mut error: Value = match &self {
            AppError::InputMissing(msg) | AppError::Validation(msg) => {
                json!({ "message": msg })
            }
            AppError::DocumentLoad { kind, message } => {
                tracing::warn!("Unreadable {kind} document: {message}");
                json!({ "message": self.to_string(), "document": kind })
            }
            AppError::ServiceUnavailable { kind, message } => {
                tracing::error!("Text generation failed for {kind} document: {message}");
                json!({ "message": self.to_string(), "document": kind })
            }
            AppError::Parse { kind, error } => {
                tracing::error!(
                    "Model reply for {kind} document could not be parsed: {}",
                    error.message
                );
                json!({
                    "message": format!("Could not convert the model reply for the {kind} document into JSON"),
                    "document": kind,
                    "raw_reply": error.raw_reply,
                    "sanitized": error.sanitized,
                    "detail": error.message,
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({ "message": "An internal server error occurred" })
            }
        };
        error["code"] = json!(code);

        (status, Json(json!({ "error": error }))).into_response()
    }
}
