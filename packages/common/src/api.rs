//! Wire types shared by the HTTP API and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body for a successful CSV upload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// ID of the newly created batch.
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "File uploaded and processed successfully")]
    pub message: String,
    /// Number of records persisted for the batch.
    #[schema(example = 15)]
    pub records: usize,
    /// IDs of batches evicted to stay within the retention window.
    #[serde(default)]
    pub evicted: Vec<i32>,
}

/// Aggregate statistics over one batch. Averages are `null` for an empty batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatsResponse {
    #[schema(example = 20.0)]
    pub avg_flow: Option<f64>,
    #[schema(example = 5.4)]
    pub avg_pressure: Option<f64>,
    #[schema(example = 110.5)]
    pub avg_temp: Option<f64>,
    #[schema(example = 3)]
    pub total_count: u64,
}

/// Number of records of one equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DistributionEntry {
    #[schema(example = "Pump")]
    pub equipment_type: String,
    #[schema(example = 2)]
    pub count: u64,
}

/// One equipment measurement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordResponse {
    #[schema(example = "Pump-1")]
    pub equipment_name: String,
    #[schema(example = "Pump")]
    pub equipment_type: String,
    #[schema(example = 120)]
    pub flowrate: i32,
    #[schema(example = 5.2)]
    pub pressure: f64,
    #[schema(example = 110)]
    pub temperature: i32,
}

/// Dashboard view of the most recent upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    /// Original name of the uploaded file.
    #[schema(example = "sample_equipment_data.csv")]
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub stats: StatsResponse,
    pub distribution: Vec<DistributionEntry>,
    /// Every record of the batch, in upload order.
    pub data: Vec<RecordResponse>,
}

/// One retained upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HistoryEntry {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "sample_equipment_data.csv")]
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `MISSING_COLUMNS`,
    /// `PARSE_ERROR`, `NOT_FOUND`, `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "MISSING_COLUMNS")]
    pub code: String,
    /// Human-readable error description.
    #[schema(example = "Missing columns: [\"Pressure\"]. Found: [\"Equipment Name\", \"Type\"]")]
    pub error: String,
    /// Structured diagnostics, present for `MISSING_COLUMNS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ColumnDiagnostics>,
}

/// Which required columns were missing and which columns the file actually had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ColumnDiagnostics {
    pub missing: Vec<String>,
    pub found: Vec<String>,
}
