use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::store::MonitorStore;

/// Shared handler state: the injected store handle plus configuration.
///
/// Holds no request data; everything mutable lives in the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MonitorStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn MonitorStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Length of the sensor history window.
    #[must_use]
    pub fn sensor_window(&self) -> Duration {
        Duration::hours(self.config.sensor_window_hours)
    }
}
