//! Retention pass against the in-memory store.
//!
//! Run with: cargo test --test retention_test

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::{Duration, Utc};

use common::{test_config, InMemoryStore};
use home_monitor::common::AppState;
use home_monitor::models::DeviceReport;
use home_monitor::retention::scheduler::{prune_once, run_retention};
use home_monitor::store::MonitorStore;

fn report(co2_level: f64) -> DeviceReport {
    DeviceReport {
        error_code: None,
        co2_level,
        temperature: 20.0,
        alarm_active: false,
        alarm_active_time: 0,
    }
}

#[tokio::test]
async fn prune_once_drops_old_history() {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(store.clone(), test_config());
    let now = Utc::now();

    store.record_report(&report(1.0), now - Duration::days(10)).await.unwrap();
    store.record_report(&report(2.0), now - Duration::days(8)).await.unwrap();
    store.record_report(&report(3.0), now - Duration::hours(1)).await.unwrap();

    prune_once(&state, 7).await;

    assert_eq!(store.sensor_count(), 1);
    assert_eq!(store.status_count(), 1);
    let current = store.latest_status().await.unwrap().unwrap();
    assert_eq!(current.co2_level, 3.0);
}

#[tokio::test]
async fn prune_failure_is_not_fatal() {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(store.clone(), test_config());
    store.unreachable.store(true, Ordering::SeqCst);

    prune_once(&state, 7).await;

    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn disabled_retention_returns_immediately() {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(store.clone(), test_config());
    assert_eq!(state.config.retention_days, None);

    run_retention(state).await;

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}
