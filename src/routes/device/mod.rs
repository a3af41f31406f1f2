pub mod handlers;
mod types;

pub use handlers::{get_device_status, update_device};
pub use types::{DeviceStatusResponse, DeviceUpdateRequest, DeviceUpdateResponse};
