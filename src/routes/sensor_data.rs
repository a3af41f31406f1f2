use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppResult;
use crate::models::SensorSample;

/// One point of the sensor history chart
#[derive(Debug, Serialize, ToSchema)]
pub struct SensorDataPoint {
    pub timestamp: DateTime<Utc>,
    pub co2_level: f64,
    pub temperature: f64,
}

impl From<SensorSample> for SensorDataPoint {
    fn from(s: SensorSample) -> Self {
        Self {
            timestamp: s.timestamp,
            co2_level: s.co2_level,
            temperature: s.temperature,
        }
    }
}

/// Sensor history for the trailing window
///
/// Samples newer than now minus the configured window (24h by default),
/// oldest first. An empty window yields an empty array.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    responses(
        (status = 200, description = "Sensor samples in ascending time order", body = Vec<SensorDataPoint>),
    ),
    tag = "sensor-data"
)]
pub async fn get_sensor_data(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SensorDataPoint>>> {
    let since = Utc::now() - state.sensor_window();
    let samples = state.store.sensor_history(since).await?;

    tracing::debug!(count = samples.len(), since = %since, "Sensor history loaded");

    Ok(Json(samples.into_iter().map(SensorDataPoint::from).collect()))
}
