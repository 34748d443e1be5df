use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::api::{ErrorResponse, HistoryEntry, SummaryResponse};
use tracing::instrument;

use crate::aggregate::summarize_latest;
use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/summary",
    tag = "Dashboard",
    operation_id = "getSummary",
    summary = "Summarize the latest upload",
    description = "Returns averages, the per-type distribution and every record of the most recent batch. \
        Returns 204 with an empty body when nothing has been uploaded yet.",
    responses(
        (status = 200, description = "Summary of the latest batch", body = SummaryResponse),
        (status = 204, description = "No data available"),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_summary(State(state): State<AppState>) -> Result<Response, AppError> {
    match summarize_latest(&state.db).await? {
        Some(summary) => Ok(Json(SummaryResponse::from(summary)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/history",
    tag = "Dashboard",
    operation_id = "listHistory",
    summary = "List retained uploads",
    description = "Returns the retained batches, newest first.",
    responses(
        (status = 200, description = "Retained batches", body = Vec<HistoryEntry>),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let batches = state.retention.history(&state.db).await?;
    Ok(Json(
        batches
            .into_iter()
            .map(|b| HistoryEntry {
                id: b.id,
                file_name: b.file_name,
                uploaded_at: b.uploaded_at,
            })
            .collect(),
    ))
}
