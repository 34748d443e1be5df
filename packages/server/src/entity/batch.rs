use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One ingestion event: a single validated CSV upload.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batch")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Original upload filename.
    pub file_name: String,

    #[sea_orm(has_many)]
    pub records: HasMany<super::record::Entity>,

    pub uploaded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
