use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== DEVICE STATUS ==========
        // Append-only: one row per device report, latest row is the current status
        manager
            .create_table(
                Table::create()
                    .table(DeviceStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceStatus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceStatus::LastSeen)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeviceStatus::ErrorCode).text())
                    .col(
                        ColumnDef::new(DeviceStatus::Co2Level)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DeviceStatus::Temperature)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DeviceStatus::AlarmActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DeviceStatus::AlarmActiveTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_device_status_last_seen")
                    .table(DeviceStatus::Table)
                    .col(DeviceStatus::LastSeen)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ========== ALARM TIME ==========
        manager
            .create_table(
                Table::create()
                    .table(AlarmTime::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlarmTime::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlarmTime::Time).text().not_null())
                    .col(
                        ColumnDef::new(AlarmTime::Armed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SENSOR DATA ==========
        manager
            .create_table(
                Table::create()
                    .table(SensorData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SensorData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SensorData::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SensorData::Co2Level).double().not_null())
                    .col(ColumnDef::new(SensorData::Temperature).double().not_null())
                    .to_owned(),
            )
            .await?;

        // Window queries scan by time
        manager
            .create_index(
                Index::create()
                    .name("idx_sensor_data_timestamp")
                    .table(SensorData::Table)
                    .col(SensorData::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SensorData::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlarmTime::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(DeviceStatus::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum DeviceStatus {
    Table,
    Id,
    LastSeen,
    ErrorCode,
    #[sea_orm(iden = "co2_level")]
    Co2Level,
    Temperature,
    AlarmActive,
    AlarmActiveTime,
}

#[derive(DeriveIden)]
pub enum AlarmTime {
    Table,
    Id,
    Time,
    Armed,
}

#[derive(DeriveIden)]
pub enum SensorData {
    Table,
    Id,
    Timestamp,
    #[sea_orm(iden = "co2_level")]
    Co2Level,
    Temperature,
}
