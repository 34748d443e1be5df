use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::retention::RetentionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub retention: Arc<RetentionManager>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let retention = Arc::new(RetentionManager::new(config.retention.max_batches));
        Self {
            db,
            config,
            retention,
        }
    }
}
