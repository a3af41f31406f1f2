use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};

use crate::common::AppState;

/// Periodically delete history older than the configured retention horizon.
///
/// Returns immediately when retention is disabled. A failed pass is logged and
/// the next tick runs as usual.
pub async fn run_retention(state: AppState) {
    let Some(retention_days) = state.config.retention_days else {
        tracing::debug!("Retention disabled");
        return;
    };
    let interval_secs = state.config.retention_interval_seconds;

    tracing::info!(retention_days, interval_secs, "Starting retention scheduler");

    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        ticker.tick().await;
        prune_once(&state, retention_days).await;
    }
}

/// One retention pass with `retention_days` measured back from now.
pub async fn prune_once(state: &AppState, retention_days: i64) {
    let cutoff = Utc::now() - chrono::Duration::days(retention_days);

    match state.store.prune_before(cutoff).await {
        Ok(report) => {
            tracing::info!(
                cutoff = %cutoff,
                sensor_rows = report.sensor_rows,
                status_rows = report.status_rows,
                "Retention pass completed"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, cutoff = %cutoff, "Retention pass failed");
        }
    }
}
