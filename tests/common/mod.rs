//! Shared test fixtures: an in-memory `MonitorStore` and router helpers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde_json::Value;
use tower::ServiceExt;

use home_monitor::common::AppState;
use home_monitor::config::Config;
use home_monitor::models::{AlarmConfig, DeviceReport, DeviceStatus, PruneReport, SensorSample};
use home_monitor::routes::build_router;
use home_monitor::store::MonitorStore;

#[derive(Default)]
struct Tables {
    status: Vec<DeviceStatus>,
    alarms: Vec<AlarmConfig>,
    sensor: Vec<SensorSample>,
}

/// Store that keeps every table in memory.
///
/// `fail_sensor_insert` makes the second insert of a report fail, the way a
/// rejected write inside a database transaction would; nothing is kept.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    pub fail_sensor_insert: AtomicBool,
    pub unreachable: AtomicBool,
    pub calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn status_count(&self) -> usize {
        self.tables.lock().unwrap().status.len()
    }

    pub fn sensor_count(&self) -> usize {
        self.tables.lock().unwrap().sensor.len()
    }

    pub fn alarm_rows(&self) -> Vec<AlarmConfig> {
        self.tables.lock().unwrap().alarms.clone()
    }

    pub fn push_sample(&self, timestamp: DateTime<Utc>, co2_level: f64, temperature: f64) {
        self.tables.lock().unwrap().sensor.push(SensorSample {
            timestamp,
            co2_level,
            temperature,
        });
    }

    fn enter(&self) -> Result<(), DbErr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MonitorStore for InMemoryStore {
    async fn ping(&self) -> Result<(), DbErr> {
        self.enter()
    }

    async fn record_report(
        &self,
        report: &DeviceReport,
        received_at: DateTime<Utc>,
    ) -> Result<i32, DbErr> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();

        let id = i32::try_from(tables.status.len()).unwrap() + 1;
        let status = DeviceStatus {
            id,
            last_seen: received_at,
            error_code: report.error_code.clone(),
            co2_level: report.co2_level,
            temperature: report.temperature,
            alarm_active: report.alarm_active,
            alarm_active_time: report.alarm_active_time,
        };

        if self.fail_sensor_insert.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("sensor_data insert rejected".to_string()));
        }

        tables.status.push(status);
        tables.sensor.push(SensorSample {
            timestamp: received_at,
            co2_level: report.co2_level,
            temperature: report.temperature,
        });
        Ok(id)
    }

    async fn latest_status(&self) -> Result<Option<DeviceStatus>, DbErr> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .status
            .iter()
            .max_by_key(|s| (s.last_seen, s.id))
            .cloned())
    }

    async fn latest_alarm(&self) -> Result<Option<AlarmConfig>, DbErr> {
        self.enter()?;
        Ok(self.tables.lock().unwrap().alarms.last().cloned())
    }

    async fn append_alarm(&self, config: &AlarmConfig) -> Result<(), DbErr> {
        self.enter()?;
        self.tables.lock().unwrap().alarms.push(config.clone());
        Ok(())
    }

    async fn set_armed(&self, armed: bool) -> Result<Option<AlarmConfig>, DbErr> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(current) = tables.alarms.last().cloned() else {
            return Ok(None);
        };
        let next = AlarmConfig {
            time: current.time,
            armed,
        };
        tables.alarms.push(next.clone());
        Ok(Some(next))
    }

    async fn sensor_history(&self, since: DateTime<Utc>) -> Result<Vec<SensorSample>, DbErr> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<SensorSample> = tables
            .sensor
            .iter()
            .filter(|s| s.timestamp > since)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.timestamp);
        Ok(rows)
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<PruneReport, DbErr> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();

        let sensor_before = tables.sensor.len();
        tables.sensor.retain(|s| s.timestamp >= cutoff);

        let current_id = tables
            .status
            .iter()
            .max_by_key(|s| (s.last_seen, s.id))
            .map(|s| s.id);
        let status_before = tables.status.len();
        tables
            .status
            .retain(|s| s.last_seen >= cutoff || Some(s.id) == current_id);

        Ok(PruneReport {
            sensor_rows: (sensor_before - tables.sensor.len()) as u64,
            status_rows: (status_before - tables.status.len()) as u64,
        })
    }
}

pub fn test_config() -> Config {
    config_with(&[])
}

/// Test configuration with `overrides` taking precedence over the defaults.
pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    Config::from_lookup(|key| {
        if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == key) {
            return Some((*value).to_string());
        }
        match key {
            "DATABASE_URL" => Some("postgres://test@localhost/test".to_string()),
            "DISABLE_RATE_LIMITING" => Some("true".to_string()),
            _ => None,
        }
    })
    .unwrap()
}

pub fn test_app() -> (Router, Arc<InMemoryStore>) {
    test_app_with(&[])
}

pub fn test_app_with(overrides: &[(&str, &str)]) -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(store.clone(), config_with(overrides));
    (build_router(state), store)
}

/// Send a request and keep the raw response, for answers that are not JSON.
pub async fn send_raw(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// POST without a Content-Type header, like the device firmware does.
pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri).body(Body::from(body.to_string())).unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}
