use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::AlarmConfig;

/// Alarm configuration
#[derive(Debug, Serialize, ToSchema)]
pub struct AlarmResponse {
    /// Time of day `HH:mm`, empty when never configured
    pub time: String,
    pub armed: bool,
}

impl From<Option<AlarmConfig>> for AlarmResponse {
    fn from(config: Option<AlarmConfig>) -> Self {
        match config {
            Some(c) => Self {
                time: c.time,
                armed: c.armed,
            },
            None => Self {
                time: String::new(),
                armed: false,
            },
        }
    }
}

/// New alarm time
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAlarmRequest {
    /// Time of day `HH:mm` (24h)
    pub time: String,
    /// Defaults to true
    pub armed: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ArmRequest {
    pub armed: bool,
}
