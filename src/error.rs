//! Service-wide error taxonomy with HTTP mapping.
//!
//! Every fallible path surfaces one of these variants; handlers return them
//! directly and axum serializes a JSON body with a machine-readable `kind`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Client-correctable input problem (bad CUIT, bad date, negative amount).
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Unique constraint would be broken (duplicate supplier name/CUIT, email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing/invalid credentials or token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// OCR text had no recoverable JSON, or confidence was below the gate.
    /// Carries enough detail for the client to prompt for a clearer photo.
    #[error(transparent)]
    OcrParse(#[from] crate::ocr::OcrParseError),

    /// The vision model collaborator failed.
    #[error("vision model error: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_threshold: Option<f64>,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::OcrParse(_) => "ocr_parse_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::OcrParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let (confidence, confidence_threshold) = match &self {
            AppError::OcrParse(crate::ocr::OcrParseError::BelowThreshold {
                confidence,
                threshold,
            }) => (Some(*confidence), Some(*threshold)),
            _ => (None, None),
        };

        let body = ErrorBody {
            kind: self.kind(),
            error: self.to_string(),
            confidence,
            confidence_threshold,
        };

        (status, Json(body)).into_response()
    }
}
