use axum::{extract::State, http::StatusCode, Json};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{normalize_alarm_time, AlarmConfig};
use crate::routes::extract::JsonBody;

use super::types::{AlarmResponse, ArmRequest, SetAlarmRequest};

/// Get the current alarm configuration
#[utoipa::path(
    get,
    path = "/api/alarm",
    responses(
        (status = 200, description = "Current alarm configuration", body = AlarmResponse),
    ),
    tag = "alarm"
)]
pub async fn get_alarm(State(state): State<AppState>) -> AppResult<Json<AlarmResponse>> {
    let config = state.store.latest_alarm().await?;

    Ok(Json(AlarmResponse::from(config)))
}

/// Set a new alarm time
#[utoipa::path(
    post,
    path = "/api/alarm",
    request_body = SetAlarmRequest,
    responses(
        (status = 201, description = "Alarm time stored", body = AlarmResponse),
        (status = 400, description = "Malformed body or time not HH:mm"),
    ),
    tag = "alarm"
)]
pub async fn set_alarm(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SetAlarmRequest>,
) -> AppResult<(StatusCode, Json<AlarmResponse>)> {
    let time = normalize_alarm_time(&request.time)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let config = AlarmConfig {
        time,
        armed: request.armed.unwrap_or(true),
    };
    state.store.append_alarm(&config).await?;

    tracing::info!(time = %config.time, armed = config.armed, "Alarm time set");

    Ok((StatusCode::CREATED, Json(AlarmResponse::from(Some(config)))))
}

/// Arm or disarm the alarm
///
/// Appends a copy of the current configuration with the new flag. Without a
/// configured alarm time nothing is written.
#[utoipa::path(
    post,
    path = "/api/alarm/arm",
    request_body = ArmRequest,
    responses(
        (status = 200, description = "Flag applied"),
        (status = 400, description = "Malformed body"),
    ),
    tag = "alarm"
)]
pub async fn set_alarm_armed(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ArmRequest>,
) -> AppResult<StatusCode> {
    match state.store.set_armed(request.armed).await? {
        Some(config) => {
            tracing::info!(time = %config.time, armed = config.armed, "Alarm armed flag changed");
        }
        None => {
            tracing::warn!(armed = request.armed, "No alarm configured, armed flag ignored");
        }
    }

    Ok(StatusCode::OK)
}
