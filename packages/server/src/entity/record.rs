use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One equipment measurement row. Immutable once inserted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub batch_id: i32,
    #[sea_orm(belongs_to, from = "batch_id", to = "id", on_delete = "Cascade")]
    pub batch: HasOne<super::batch::Entity>,

    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: i32,    // m³/h
    pub pressure: f64,    // bar
    pub temperature: i32, // °C
}

impl ActiveModelBehavior for ActiveModel {}
