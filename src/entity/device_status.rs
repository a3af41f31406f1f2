use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_status")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub last_seen: DateTimeWithTimeZone,
    pub error_code: Option<String>,
    pub co2_level: f64,
    pub temperature: f64,
    pub alarm_active: bool,
    pub alarm_active_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
