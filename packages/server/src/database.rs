use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{batch, record};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    prepare_schema(&db).await?;

    Ok(db)
}

/// Create missing tables and indexes. Safe to run on every startup.
pub async fn prepare_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("server::entity::*")
        .sync(db)
        .await?;
    ensure_indexes(db).await;
    Ok(())
}

/// Schema sync only creates key indexes, so lookup indexes are added by hand.
async fn ensure_indexes(db: &DatabaseConnection) {
    let backend = db.get_database_backend();

    // Summary and cascade deletes select records by batch.
    let by_batch = Index::create()
        .if_not_exists()
        .name("idx_record_batch_id")
        .table(record::Entity)
        .col(record::Column::BatchId)
        .to_owned();

    // Eviction and latest-batch lookups order by upload time.
    let by_upload_time = Index::create()
        .if_not_exists()
        .name("idx_batch_uploaded_at")
        .table(batch::Entity)
        .col(batch::Column::UploadedAt)
        .col(batch::Column::Id)
        .to_owned();

    for (name, stmt) in [
        ("idx_record_batch_id", by_batch),
        ("idx_batch_uploaded_at", by_upload_time),
    ] {
        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }
}
