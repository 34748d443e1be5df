use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::api::ErrorResponse;
use tracing::{info, instrument};

use crate::aggregate::summarize_latest;
use crate::error::AppError;
use crate::report::{ReportOptions, render};
use crate::state::AppState;
use crate::utils::filename::attachment_disposition;

#[utoipa::path(
    get,
    path = "/export-pdf",
    tag = "Reports",
    operation_id = "exportPdf",
    summary = "Download a PDF report of the latest upload",
    description = "Renders the latest batch as a one-page PDF: stats panel plus the first records of the batch.",
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf"),
        (status = 404, description = "No data to export (NOT_FOUND)", body = ErrorResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let summary = summarize_latest(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No data to export".into()))?;

    let source_name = summary.batch.file_name.clone();
    let report = render(
        &summary,
        &source_name,
        ReportOptions {
            max_rows: state.config.report.max_rows,
        },
    );
    let pdf = report.to_pdf()?;

    info!(
        batch_id = summary.batch.id,
        rows = report.rows_rendered,
        bytes = pdf.len(),
        "Rendered PDF report"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, pdf.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&format!("Report_{source_name}.pdf")),
        )
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
