pub mod alarm;
pub mod device;
pub mod extract;
pub mod health;
pub mod sensor_data;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::config::Config;
use crate::services::rate_limit::ClientIpKeyExtractor;

/// Reports and alarm updates are tiny; anything larger is not a client of ours.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Server clock as Unix seconds, sent to clients for clock reference.
pub(crate) fn unix_now() -> i64 {
    Utc::now().timestamp()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        device::handlers::get_device_status,
        device::handlers::update_device,
        alarm::handlers::get_alarm,
        alarm::handlers::set_alarm,
        alarm::handlers::set_alarm_armed,
        sensor_data::get_sensor_data,
    ),
    components(
        schemas(
            device::DeviceStatusResponse,
            device::DeviceUpdateRequest,
            device::DeviceUpdateResponse,
            alarm::AlarmResponse,
            alarm::SetAlarmRequest,
            alarm::ArmRequest,
            sensor_data::SensorDataPoint,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "device", description = "Device reports and status"),
        (name = "alarm", description = "Alarm time and arming"),
        (name = "sensor-data", description = "Sensor history"),
    ),
    info(
        title = "Home Monitor API",
        description = "Device status, alarm schedule and sensor history",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let api_routes = Router::new()
        .route("/device/status", get(device::get_device_status))
        .route("/device/update", post(device::update_device))
        .route("/alarm", get(alarm::get_alarm).post(alarm::set_alarm))
        .route("/alarm/arm", post(alarm::set_alarm_armed))
        .route("/sensor-data", get(sensor_data::get_sensor_data));

    let api_routes =
        with_rate_limit(api_routes, &config).layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    // Health checks are never rate limited
    let health_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz));

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn with_rate_limit(routes: Router<AppState>, config: &Config) -> Router<AppState> {
    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        return routes;
    }

    let limiter = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers: config.trust_proxy_headers,
        })
        .per_millisecond(config.rate_limit_replenish_ms)
        .burst_size(config.rate_limit_burst)
        .finish();

    let Some(limiter) = limiter else {
        tracing::warn!(
            replenish_ms = config.rate_limit_replenish_ms,
            burst = config.rate_limit_burst,
            "Invalid rate limit quota, rate limiting DISABLED"
        );
        return routes;
    };

    tracing::info!(
        replenish_ms = config.rate_limit_replenish_ms,
        burst = config.rate_limit_burst,
        trust_proxy_headers = config.trust_proxy_headers,
        "Rate limiting configured"
    );

    routes.layer(GovernorLayer {
        config: Arc::new(limiter),
    })
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Credentials are only allowed with an explicit origin list
    layer.allow_origin(origins).allow_credentials(true)
}
