use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
    sea_query::{Expr, Order, Query},
};

use super::MonitorStore;
use crate::entity::{alarm_time, device_status, sensor_data};
use crate::models::{
    AlarmConfig, DeviceReport, DeviceStatus, ErrorCode, PruneReport, SensorSample,
};

/// [`MonitorStore`] backed by a sea-orm connection pool.
#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<device_status::Model> for DeviceStatus {
    fn from(m: device_status::Model) -> Self {
        Self {
            id: m.id,
            last_seen: m.last_seen.with_timezone(&Utc),
            error_code: m.error_code.map(ErrorCode::from),
            co2_level: m.co2_level,
            temperature: m.temperature,
            alarm_active: m.alarm_active,
            alarm_active_time: m.alarm_active_time,
        }
    }
}

impl From<alarm_time::Model> for AlarmConfig {
    fn from(m: alarm_time::Model) -> Self {
        Self {
            time: m.time,
            armed: m.armed,
        }
    }
}

impl From<sensor_data::Model> for SensorSample {
    fn from(m: sensor_data::Model) -> Self {
        Self {
            timestamp: m.timestamp.with_timezone(&Utc),
            co2_level: m.co2_level,
            temperature: m.temperature,
        }
    }
}

#[async_trait]
impl MonitorStore for DbStore {
    async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }

    async fn record_report(
        &self,
        report: &DeviceReport,
        received_at: DateTime<Utc>,
    ) -> Result<i32, DbErr> {
        // Dropping the transaction on an early return rolls both inserts back
        let txn = self.db.begin().await?;

        let status = device_status::ActiveModel {
            id: NotSet,
            last_seen: Set(received_at.into()),
            error_code: Set(report.error_code.clone().map(String::from)),
            co2_level: Set(report.co2_level),
            temperature: Set(report.temperature),
            alarm_active: Set(report.alarm_active),
            alarm_active_time: Set(report.alarm_active_time),
        };
        let inserted = device_status::Entity::insert(status).exec(&txn).await?;

        let sample = sensor_data::ActiveModel {
            id: NotSet,
            timestamp: Set(received_at.into()),
            co2_level: Set(report.co2_level),
            temperature: Set(report.temperature),
        };
        sensor_data::Entity::insert(sample).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(status_id = inserted.last_insert_id, "Device report stored");
        Ok(inserted.last_insert_id)
    }

    async fn latest_status(&self) -> Result<Option<DeviceStatus>, DbErr> {
        let row = device_status::Entity::find()
            .order_by_desc(device_status::Column::LastSeen)
            .order_by_desc(device_status::Column::Id)
            .one(&self.db)
            .await?;

        Ok(row.map(DeviceStatus::from))
    }

    async fn latest_alarm(&self) -> Result<Option<AlarmConfig>, DbErr> {
        let row = alarm_time::Entity::find()
            .order_by_desc(alarm_time::Column::Id)
            .one(&self.db)
            .await?;

        Ok(row.map(AlarmConfig::from))
    }

    async fn append_alarm(&self, config: &AlarmConfig) -> Result<(), DbErr> {
        let row = alarm_time::ActiveModel {
            id: NotSet,
            time: Set(config.time.clone()),
            armed: Set(config.armed),
        };
        alarm_time::Entity::insert(row).exec(&self.db).await?;

        Ok(())
    }

    async fn set_armed(&self, armed: bool) -> Result<Option<AlarmConfig>, DbErr> {
        // INSERT .. SELECT keeps the copy of the latest row in one statement
        let latest = Query::select()
            .column(alarm_time::Column::Time)
            .expr(Expr::val(armed))
            .from(alarm_time::Entity)
            .order_by(alarm_time::Column::Id, Order::Desc)
            .limit(1)
            .to_owned();

        let mut insert = Query::insert();
        insert
            .into_table(alarm_time::Entity)
            .columns([alarm_time::Column::Time, alarm_time::Column::Armed])
            .select_from(latest)
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        insert.returning(
            Query::returning().columns([alarm_time::Column::Time, alarm_time::Column::Armed]),
        );

        let backend = self.db.get_database_backend();
        let Some(row) = self.db.query_one(backend.build(&insert)).await? else {
            return Ok(None);
        };

        Ok(Some(AlarmConfig {
            time: row.try_get("", "time")?,
            armed: row.try_get("", "armed")?,
        }))
    }

    async fn sensor_history(&self, since: DateTime<Utc>) -> Result<Vec<SensorSample>, DbErr> {
        let since: sea_orm::prelude::DateTimeWithTimeZone = since.into();

        let rows = sensor_data::Entity::find()
            .filter(sensor_data::Column::Timestamp.gt(since))
            .order_by_asc(sensor_data::Column::Timestamp)
            .order_by_asc(sensor_data::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(SensorSample::from).collect())
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<PruneReport, DbErr> {
        let cutoff: sea_orm::prelude::DateTimeWithTimeZone = cutoff.into();
        let txn = self.db.begin().await?;

        let sensor_rows = sensor_data::Entity::delete_many()
            .filter(sensor_data::Column::Timestamp.lt(cutoff))
            .exec(&txn)
            .await?
            .rows_affected;

        let current = device_status::Entity::find()
            .order_by_desc(device_status::Column::LastSeen)
            .order_by_desc(device_status::Column::Id)
            .one(&txn)
            .await?;

        let mut status_delete = device_status::Entity::delete_many()
            .filter(device_status::Column::LastSeen.lt(cutoff));
        if let Some(current) = current {
            status_delete = status_delete.filter(device_status::Column::Id.ne(current.id));
        }
        let status_rows = status_delete.exec(&txn).await?.rows_affected;

        txn.commit().await?;

        Ok(PruneReport {
            sensor_rows,
            status_rows,
        })
    }
}
