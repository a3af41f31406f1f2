pub mod handlers;
mod types;

pub use handlers::{get_alarm, set_alarm, set_alarm_armed};
pub use types::{AlarmResponse, ArmRequest, SetAlarmRequest};
