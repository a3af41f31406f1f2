use axum::{extract::State, Json};
use chrono::Utc;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::models::DeviceReport;
use crate::routes::extract::JsonBody;
use crate::routes::unix_now;

use super::types::{DeviceStatusResponse, DeviceUpdateRequest, DeviceUpdateResponse};

/// Get the latest device status
///
/// Returns a zero-valued status when the device has never reported.
#[utoipa::path(
    get,
    path = "/api/device/status",
    responses(
        (status = 200, description = "Current device status", body = DeviceStatusResponse),
        (status = 500, description = "Store failure"),
    ),
    tag = "device"
)]
pub async fn get_device_status(
    State(state): State<AppState>,
) -> AppResult<Json<DeviceStatusResponse>> {
    let status = state.store.latest_status().await?;

    Ok(Json(DeviceStatusResponse::new(status, unix_now())))
}

/// Accept a device report
///
/// Stores the status and sensor reading together, then answers with the
/// current alarm configuration and the server clock.
#[utoipa::path(
    post,
    path = "/api/device/update",
    request_body = DeviceUpdateRequest,
    responses(
        (status = 200, description = "Report stored", body = DeviceUpdateResponse),
        (status = 400, description = "Malformed report"),
        (status = 500, description = "Store failure, nothing was written"),
    ),
    tag = "device"
)]
pub async fn update_device(
    State(state): State<AppState>,
    JsonBody(update): JsonBody<DeviceUpdateRequest>,
) -> AppResult<Json<DeviceUpdateResponse>> {
    if update.alarm_active_time < 0 {
        return Err(AppError::BadRequest(
            "alarm_active_time must not be negative".to_string(),
        ));
    }

    let report = DeviceReport::from(update);
    if let Some(code) = report.error_code.as_ref().filter(|c| c.is_error()) {
        tracing::warn!(error_code = %code, "Device reported an error");
    }

    let status_id = state.store.record_report(&report, Utc::now()).await?;
    tracing::debug!(
        status_id,
        co2_level = report.co2_level,
        temperature = report.temperature,
        alarm_active = report.alarm_active,
        "Device report recorded"
    );

    // Read only after the report committed
    let alarm = state.store.latest_alarm().await?;

    Ok(Json(DeviceUpdateResponse::new(alarm, unix_now())))
}
