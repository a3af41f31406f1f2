pub mod alarm_time;
pub mod device_status;
pub mod sensor_data;
