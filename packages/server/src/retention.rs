//! Bounded retention of upload batches.

use chrono::Utc;
use sea_orm::*;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::entity::{batch, record};
use crate::ingest::EquipmentRow;

/// Rows inserted per statement; keeps bind parameters under SQLite's limit.
const INSERT_CHUNK: usize = 500;

/// Outcome of admitting a new batch.
#[derive(Debug, Clone)]
pub struct Admission {
    pub batch: batch::Model,
    pub records: usize,
    /// Batches deleted to make room, oldest first.
    pub evicted: Vec<i32>,
}

/// Keeps at most `max_batches` upload batches, evicting the oldest on overflow.
///
/// Admissions hold `admission` for the whole count-evict-create-insert
/// sequence, so two concurrent uploads can never both skip eviction.
#[derive(Debug)]
pub struct RetentionManager {
    max_batches: u64,
    admission: Mutex<()>,
}

impl RetentionManager {
    pub fn new(max_batches: u64) -> Self {
        Self {
            max_batches: Ord::max(max_batches, 1),
            admission: Mutex::new(()),
        }
    }

    pub fn max_batches(&self) -> u64 {
        self.max_batches
    }

    /// Store `rows` as a new batch named `file_name`, evicting old batches first.
    ///
    /// Runs in a single transaction: on error nothing is evicted or created.
    #[instrument(skip(self, db, rows), fields(records = rows.len()))]
    pub async fn admit(
        &self,
        db: &DatabaseConnection,
        file_name: &str,
        rows: Vec<EquipmentRow>,
    ) -> Result<Admission, DbErr> {
        let _guard = self.admission.lock().await;
        let txn = db.begin().await?;

        let evicted = self.evict_overflow(&txn).await?;

        let batch = batch::ActiveModel {
            file_name: Set(file_name.to_string()),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let records = rows.len();
        let models: Vec<record::ActiveModel> = rows
            .into_iter()
            .map(|row| record::ActiveModel {
                batch_id: Set(batch.id),
                equipment_name: Set(row.equipment_name),
                equipment_type: Set(row.equipment_type),
                flowrate: Set(row.flowrate),
                pressure: Set(row.pressure),
                temperature: Set(row.temperature),
                ..Default::default()
            })
            .collect();

        let mut models = models.into_iter().peekable();
        while models.peek().is_some() {
            let chunk: Vec<_> = models.by_ref().take(INSERT_CHUNK).collect();
            record::Entity::insert_many(chunk)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        info!(
            batch_id = batch.id,
            file_name = %batch.file_name,
            records,
            evicted = ?evicted,
            "Admitted upload batch"
        );

        Ok(Admission {
            batch,
            records,
            evicted,
        })
    }

    /// Delete the oldest batches until one more fits in the window.
    async fn evict_overflow(&self, txn: &DatabaseTransaction) -> Result<Vec<i32>, DbErr> {
        let count = batch::Entity::find().count(txn).await?;
        if count < self.max_batches {
            return Ok(Vec::new());
        }

        let excess = count - self.max_batches + 1;
        let oldest: Vec<i32> = batch::Entity::find()
            .select_only()
            .column(batch::Column::Id)
            .order_by_asc(batch::Column::UploadedAt)
            .order_by_asc(batch::Column::Id)
            .limit(excess)
            .into_tuple()
            .all(txn)
            .await?;

        for &batch_id in &oldest {
            // Explicit so eviction does not depend on the backend enforcing the FK.
            let removed = record::Entity::delete_many()
                .filter(record::Column::BatchId.eq(batch_id))
                .exec(txn)
                .await?;
            batch::Entity::delete_by_id(batch_id).exec(txn).await?;
            info!(
                batch_id,
                records = removed.rows_affected,
                "Evicted batch outside retention window"
            );
        }

        Ok(oldest)
    }

    /// Retained batches, newest first.
    pub async fn history<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<batch::Model>, DbErr> {
        batch::Entity::find()
            .order_by_desc(batch::Column::UploadedAt)
            .order_by_desc(batch::Column::Id)
            .limit(self.max_batches)
            .all(db)
            .await
    }

    pub async fn latest<C: ConnectionTrait>(&self, db: &C) -> Result<Option<batch::Model>, DbErr> {
        latest_batch(db).await
    }
}

/// The most recent batch: greatest upload time, ties broken by highest id.
pub async fn latest_batch<C: ConnectionTrait>(db: &C) -> Result<Option<batch::Model>, DbErr> {
    batch::Entity::find()
        .order_by_desc(batch::Column::UploadedAt)
        .order_by_desc(batch::Column::Id)
        .one(db)
        .await
}
