//! Summary statistics over a single batch.

use std::collections::BTreeMap;

use common::api::{DistributionEntry, RecordResponse, StatsResponse, SummaryResponse};
use sea_orm::*;

use crate::entity::{batch, record};
use crate::retention::latest_batch;

/// Aggregated view of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub batch: batch::Model,
    pub count: u64,
    /// `None` only for an empty batch, which uploads never produce.
    pub avg_flow: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temp: Option<f64>,
    /// Records per equipment type, keyed and ordered by type name.
    pub distribution: BTreeMap<String, u64>,
    /// Every record of the batch in upload order.
    pub records: Vec<record::Model>,
}

impl Summary {
    pub fn from_records(batch: batch::Model, records: Vec<record::Model>) -> Self {
        let count = records.len() as u64;
        let mut flow = 0.0;
        let mut pressure = 0.0;
        let mut temp = 0.0;
        let mut distribution: BTreeMap<String, u64> = BTreeMap::new();

        for r in &records {
            flow += f64::from(r.flowrate);
            pressure += r.pressure;
            temp += f64::from(r.temperature);
            *distribution.entry(r.equipment_type.clone()).or_default() += 1;
        }

        let mean = |total: f64| (count > 0).then(|| total / count as f64);

        Self {
            batch,
            count,
            avg_flow: mean(flow),
            avg_pressure: mean(pressure),
            avg_temp: mean(temp),
            distribution,
            records,
        }
    }
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            filename: summary.batch.file_name,
            uploaded_at: summary.batch.uploaded_at,
            stats: StatsResponse {
                avg_flow: summary.avg_flow,
                avg_pressure: summary.avg_pressure,
                avg_temp: summary.avg_temp,
                total_count: summary.count,
            },
            distribution: summary
                .distribution
                .into_iter()
                .map(|(equipment_type, count)| DistributionEntry {
                    equipment_type,
                    count,
                })
                .collect(),
            data: summary
                .records
                .into_iter()
                .map(|r| RecordResponse {
                    equipment_name: r.equipment_name,
                    equipment_type: r.equipment_type,
                    flowrate: r.flowrate,
                    pressure: r.pressure,
                    temperature: r.temperature,
                })
                .collect(),
        }
    }
}

/// Summarize one batch, or `None` if it does not exist.
pub async fn summarize<C: ConnectionTrait>(
    db: &C,
    batch_id: i32,
) -> Result<Option<Summary>, DbErr> {
    let Some(batch) = batch::Entity::find_by_id(batch_id).one(db).await? else {
        return Ok(None);
    };
    load(db, batch).await.map(Some)
}

/// Summarize the most recent batch, or `None` if nothing has been uploaded.
pub async fn summarize_latest<C: ConnectionTrait>(db: &C) -> Result<Option<Summary>, DbErr> {
    let Some(batch) = latest_batch(db).await? else {
        return Ok(None);
    };
    load(db, batch).await.map(Some)
}

async fn load<C: ConnectionTrait>(db: &C, batch: batch::Model) -> Result<Summary, DbErr> {
    let records = record::Entity::find()
        .filter(record::Column::BatchId.eq(batch.id))
        .order_by_asc(record::Column::Id)
        .all(db)
        .await?;
    Ok(Summary::from_records(batch, records))
}
