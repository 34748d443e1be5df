use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::api::{ErrorResponse, UploadResponse};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::ingest::normalize_all;
use crate::state::AppState;
use crate::utils::filename::upload_file_name;

/// Body limit layer for the CSV upload route.
pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    operation_id = "uploadCsv",
    summary = "Upload an equipment CSV",
    description = "Validates the CSV in the `file` multipart field and stores its rows as a new batch. \
        Required columns (whitespace-trimmed, case-sensitive, any order): `Equipment Name`, `Type`, \
        `Flowrate`, `Pressure`, `Temperature`. The whole upload is rejected on the first invalid row. \
        Only the most recent batches are retained; the oldest is evicted when the window is full.",
    request_body(content_type = "multipart/form-data", description = "CSV file in the `file` field"),
    responses(
        (status = 201, description = "Batch created", body = UploadResponse),
        (status = 400, description = "Invalid upload (VALIDATION_ERROR, MISSING_COLUMNS, PARSE_ERROR)", body = ErrorResponse),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
            upload = Some((file_name, data.to_vec()));
            break;
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| AppError::Validation("No file provided".into()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
    let file_name = upload_file_name(&file_name)
        .map_err(|e| AppError::Validation(e.message().into()))?
        .to_string();

    let rows = normalize_all(&bytes).inspect_err(|e| {
        info!(file_name = %file_name, error = %e, "Rejected CSV upload");
    })?;

    let admission = state.retention.admit(&state.db, &file_name, rows).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id: admission.batch.id,
            message: "File uploaded and processed successfully".into(),
            records: admission.records,
            evicted: admission.evicted,
        }),
    ))
}
