//! Persistence port.
//!
//! Handlers only ever talk to a [`MonitorStore`]; production wires in
//! [`DbStore`], tests substitute an in-memory implementation.

mod database;

pub use database::DbStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sea_orm::{Database, DatabaseConnection, DbErr, SqlxPostgresConnector};

use crate::config::DatabaseSettings;
use crate::models::{AlarmConfig, DeviceReport, DeviceStatus, PruneReport, SensorSample};

#[async_trait]
pub trait MonitorStore: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), DbErr>;

    /// Persist one device report as a status row plus a sensor row, atomically.
    ///
    /// Returns the id of the new status row. On error neither row is visible.
    async fn record_report(
        &self,
        report: &DeviceReport,
        received_at: DateTime<Utc>,
    ) -> Result<i32, DbErr>;

    /// Most recent status row, `None` while the device has never reported.
    async fn latest_status(&self) -> Result<Option<DeviceStatus>, DbErr>;

    /// Current alarm configuration, `None` until one has been set.
    async fn latest_alarm(&self) -> Result<Option<AlarmConfig>, DbErr>;

    async fn append_alarm(&self, config: &AlarmConfig) -> Result<(), DbErr>;

    /// Append a copy of the current alarm carrying the new `armed` flag.
    ///
    /// Returns the new configuration, or `None` (and writes nothing) when no
    /// alarm has been configured yet.
    async fn set_armed(&self, armed: bool) -> Result<Option<AlarmConfig>, DbErr>;

    /// Sensor samples strictly newer than `since`, oldest first.
    async fn sensor_history(&self, since: DateTime<Utc>) -> Result<Vec<SensorSample>, DbErr>;

    /// Drop history older than `cutoff`. The current status row is always kept.
    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<PruneReport, DbErr>;
}

/// Open the PostgreSQL pool described by `settings`.
///
/// # Errors
///
/// Returns `DbErr` if the SSL mode is unknown or the server cannot be reached.
pub async fn connect(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    let (host, port, user, password, name, ssl_mode) = match settings {
        DatabaseSettings::Url(url) => return Database::connect(url.as_str()).await,
        DatabaseSettings::Parts {
            host,
            port,
            user,
            password,
            name,
            ssl_mode,
        } => (host, *port, user, password, name, ssl_mode),
    };

    let ssl_mode: PgSslMode = ssl_mode
        .parse()
        .map_err(|e| DbErr::Custom(format!("Invalid DB_SSLMODE '{ssl_mode}': {e}")))?;

    let mut options = PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(user)
        .database(name)
        .ssl_mode(ssl_mode);
    if !password.is_empty() {
        options = options.password(password);
    }

    let pool = PgPoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| DbErr::Custom(format!("Failed to connect to {host}:{port}/{name}: {e}")))?;

    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}
