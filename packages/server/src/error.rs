use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::api::{ColumnDiagnostics, ErrorResponse};
use sea_orm::DbErr;

use crate::ingest::IngestError;
use crate::report::ReportError;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request, e.g. a missing multipart field.
    Validation(String),
    /// The uploaded CSV lacks required columns.
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// Unreadable or non-coercible tabular data.
    Parse(String),
    NotFound(String),
    /// Reserved for admission races; the admission lock currently prevents them.
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                body("VALIDATION_ERROR", msg, None),
            ),
            AppError::MissingColumns { missing, found } => (
                StatusCode::BAD_REQUEST,
                body(
                    "MISSING_COLUMNS",
                    format!("Missing columns: {missing:?}. Found: {found:?}"),
                    Some(ColumnDiagnostics { missing, found }),
                ),
            ),
            AppError::Parse(msg) => (
                StatusCode::BAD_REQUEST,
                body("PARSE_ERROR", format!("Failed to read CSV: {msg}"), None),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, body("NOT_FOUND", msg, None)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, body("CONFLICT", msg, None)),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    body(
                        "INTERNAL_ERROR",
                        "An unexpected error occurred".into(),
                        None,
                    ),
                )
            }
        }
    }
}

fn body(code: &str, error: String, details: Option<ColumnDiagnostics>) -> ErrorResponse {
    ErrorResponse {
        code: code.to_string(),
        error,
        details,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MissingColumns { missing, found } => {
                AppError::MissingColumns { missing, found }
            }
            other => AppError::Parse(other.to_string()),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        AppError::Internal(format!("Failed to render report: {err}"))
    }
}
