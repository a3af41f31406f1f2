use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{AlarmConfig, DeviceReport, DeviceStatus, ErrorCode};

/// Current device status as shown on the dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceStatusResponse {
    /// 0 when the device has never reported
    pub id: i32,
    /// Server time of the latest report (null when none)
    pub last_seen: Option<DateTime<Utc>>,
    /// Omitted when the device sent no error code; "NO_ERROR" means healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub error_code: Option<ErrorCode>,
    pub co2_level: f64,
    pub temperature: f64,
    pub alarm_active: bool,
    /// Seconds the alarm has been sounding
    pub alarm_active_time: i64,
    /// Server Unix time (seconds)
    pub current_time: i64,
}

impl DeviceStatusResponse {
    pub fn new(status: Option<DeviceStatus>, current_time: i64) -> Self {
        match status {
            Some(s) => Self {
                id: s.id,
                last_seen: Some(s.last_seen),
                error_code: s.error_code,
                co2_level: s.co2_level,
                temperature: s.temperature,
                alarm_active: s.alarm_active,
                alarm_active_time: s.alarm_active_time,
                current_time,
            },
            None => Self {
                id: 0,
                last_seen: None,
                error_code: None,
                co2_level: 0.0,
                temperature: 0.0,
                alarm_active: false,
                alarm_active_time: 0,
                current_time,
            },
        }
    }
}

/// Periodic report posted by the device
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeviceUpdateRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub error_code: Option<ErrorCode>,
    pub co2_level: f64,
    pub temperature: f64,
    #[serde(default)]
    pub alarm_active: bool,
    /// Seconds the alarm has been sounding (non-negative)
    #[serde(default)]
    pub alarm_active_time: i64,
}

impl From<DeviceUpdateRequest> for DeviceReport {
    fn from(r: DeviceUpdateRequest) -> Self {
        Self {
            error_code: r.error_code,
            co2_level: r.co2_level,
            temperature: r.temperature,
            alarm_active: r.alarm_active,
            alarm_active_time: r.alarm_active_time,
        }
    }
}

/// Alarm configuration handed back to the device after each report
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceUpdateResponse {
    /// Alarm time `HH:mm`, empty when no alarm is configured
    pub time: String,
    pub armed: bool,
    /// Server Unix time (seconds), for the device clock
    pub current_time: i64,
}

impl DeviceUpdateResponse {
    pub fn new(alarm: Option<AlarmConfig>, current_time: i64) -> Self {
        let alarm = alarm.unwrap_or(AlarmConfig {
            time: String::new(),
            armed: false,
        });

        Self {
            time: alarm.time,
            armed: alarm.armed,
            current_time,
        }
    }
}
