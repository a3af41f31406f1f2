//! Domain types shared by the store and the HTTP layer.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire and storage value the firmware sends when it has nothing to report.
pub const NO_ERROR_CODE: &str = "NO_ERROR";

const ALARM_TIME_FORMAT: &str = "%H:%M";

/// Error state carried by a device report.
///
/// A report without any error code is `Option::<ErrorCode>::None`; a report that
/// explicitly says "all good" is `ErrorCode::NoError`. Both are healthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    NoError,
    Code(String),
}

impl ErrorCode {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Code(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoError => NO_ERROR_CODE,
            Self::Code(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(raw: String) -> Self {
        if raw == NO_ERROR_CODE {
            Self::NoError
        } else {
            Self::Code(raw)
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::NoError => NO_ERROR_CODE.to_string(),
            ErrorCode::Code(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One report as posted by the device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReport {
    pub error_code: Option<ErrorCode>,
    pub co2_level: f64,
    pub temperature: f64,
    pub alarm_active: bool,
    /// Seconds the alarm has been sounding, as counted by the device.
    pub alarm_active_time: i64,
}

/// A stored device status row.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatus {
    pub id: i32,
    pub last_seen: DateTime<Utc>,
    pub error_code: Option<ErrorCode>,
    pub co2_level: f64,
    pub temperature: f64,
    pub alarm_active: bool,
    pub alarm_active_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmConfig {
    /// Trigger time of day, `HH:mm`.
    pub time: String,
    pub armed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorSample {
    pub timestamp: DateTime<Utc>,
    pub co2_level: f64,
    pub temperature: f64,
}

/// Rows removed by one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub sensor_rows: u64,
    pub status_rows: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid alarm time '{0}', expected HH:mm")]
pub struct InvalidAlarmTime(pub String);

/// Validate an `HH:mm` alarm time, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns `InvalidAlarmTime` for anything that is not exactly two hour digits,
/// a colon and two minute digits forming a valid 24h time of day.
pub fn normalize_alarm_time(raw: &str) -> Result<String, InvalidAlarmTime> {
    let invalid = || InvalidAlarmTime(raw.to_string());
    let trimmed = raw.trim();

    // chrono accepts single-digit fields for %H and %M; the wire format does not
    if !is_two_digit_pair(trimmed) {
        return Err(invalid());
    }

    NaiveTime::parse_from_str(trimmed, ALARM_TIME_FORMAT)
        .map(|t| t.format(ALARM_TIME_FORMAT).to_string())
        .map_err(|_| invalid())
}

fn is_two_digit_pair(s: &str) -> bool {
    matches!(
        s.as_bytes(),
        [h1, h2, b':', m1, m2] if [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit())
    )
}
