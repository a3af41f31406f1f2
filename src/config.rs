use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Upper bound for `SENSOR_WINDOW_HOURS` (ten years).
pub const MAX_SENSOR_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// Upper bound for `RETENTION_DAYS` (a hundred years).
pub const MAX_RETENTION_DAYS: i64 = 365 * 100;

/// Where the store lives.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    /// Full connection URL from `DATABASE_URL`
    Url(String),
    /// Discrete `DB_*` settings; credentials are passed as-is, never through a URL
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
        ssl_mode: String,
    },
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(_) => f.write_str("Url(<redacted>)"),
            Self::Parts {
                host,
                port,
                user,
                name,
                ssl_mode,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("name", name)
                .field("ssl_mode", ssl_mode)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database: DatabaseSettings,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    pub cors_allowed_origins: Vec<String>,

    // Sensor history
    pub sensor_window_hours: i64,

    // Retention
    pub retention_days: Option<i64>,
    pub retention_interval_seconds: u64,

    // Rate limiting
    pub disable_rate_limiting: bool,
    /// One quota token is replenished every this many milliseconds
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
    pub trust_proxy_headers: bool,

    // Logging
    pub log_format: LogFormat,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither `DATABASE_URL` nor the
    /// `DB_HOST`/`DB_USER`/`DB_NAME` triple is available.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retention_days =
            parse_or(&lookup, "RETENTION_DAYS", 0i64).min(MAX_RETENTION_DAYS);

        Ok(Self {
            database: database_settings(&lookup)?,

            api_host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or(&lookup, "API_PORT", 8080),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),

            sensor_window_hours: parse_or(&lookup, "SENSOR_WINDOW_HOURS", 24i64)
                .clamp(1, MAX_SENSOR_WINDOW_HOURS),

            retention_days: (retention_days > 0).then_some(retention_days),
            retention_interval_seconds: parse_or(&lookup, "RETENTION_INTERVAL_SECONDS", 3600u64)
                .clamp(1, 86_400 * 365),

            disable_rate_limiting: parse_or(&lookup, "DISABLE_RATE_LIMITING", false),
            rate_limit_replenish_ms: parse_or(&lookup, "RATE_LIMIT_REPLENISH_MS", 100),
            rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", 60),
            trust_proxy_headers: parse_or(&lookup, "TRUST_PROXY_HEADERS", true),

            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },

            deployment: Deployment::from_str(
                &lookup("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            ),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `DATABASE_URL` wins; otherwise the connection is described by the `DB_*` parts.
fn database_settings<F>(lookup: &F) -> Result<DatabaseSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
        return Ok(DatabaseSettings::Url(url));
    }

    Ok(DatabaseSettings::Parts {
        host: lookup("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?,
        user: lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
        name: lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
        port: parse_or(lookup, "DB_PORT", 5432),
        password: lookup("DB_PASSWORD").unwrap_or_default(),
        ssl_mode: lookup("DB_SSLMODE").unwrap_or_else(|| "disable".to_string()),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
