use domain::services::scheduling::BusinessHours;
use serde::Deserialize;
use shared::validation::parse_time_of_day;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Shared key required in `X-API-Key` when set. Unset or empty leaves
    /// the API open.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl SecurityConfig {
    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Opening time, `HH:MM`.
    #[serde(default = "default_opening_time")]
    pub opening_time: String,

    /// Closing time, `HH:MM`.
    #[serde(default = "default_closing_time")]
    pub closing_time: String,

    /// Spacing of candidate start times in minutes.
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            opening_time: default_opening_time(),
            closing_time: default_closing_time(),
            slot_minutes: default_slot_minutes(),
        }
    }
}

impl SchedulingConfig {
    /// Parses the configured window.
    pub fn business_hours(&self) -> Result<BusinessHours, ConfigValidationError> {
        let opening = parse_time_of_day(&self.opening_time).ok_or_else(|| {
            ConfigValidationError::InvalidValue(format!(
                "scheduling.opening_time must be HH:MM, got '{}'",
                self.opening_time
            ))
        })?;
        let closing = parse_time_of_day(&self.closing_time).ok_or_else(|| {
            ConfigValidationError::InvalidValue(format!(
                "scheduling.closing_time must be HH:MM, got '{}'",
                self.closing_time
            ))
        })?;
        BusinessHours::new(opening, closing, self.slot_minutes)
            .map_err(|e| ConfigValidationError::InvalidValue(e.to_string()))
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    5
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_opening_time() -> String {
    "08:00".to_string()
}
fn default_closing_time() -> String {
    "18:00".to_string()
}
fn default_slot_minutes() -> u32 {
    30
}

/// Embedded defaults, matching `config/default.toml`.
const DEFAULTS_TOML: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 5000
    request_timeout_secs = 30

    [database]
    url = ""
    max_connections = 5
    min_connections = 1
    connect_timeout_secs = 10
    idle_timeout_secs = 600

    [logging]
    level = "info"
    format = "pretty"

    [security]
    cors_origins = []

    [scheduling]
    opening_time = "08:00"
    closing_time = "18:00"
    slot_minutes = 30
"#;

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with BARBER__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULTS_TOML,
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BARBER").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from the embedded defaults plus overrides, without
    /// touching the file system or environment. Skips validation so tests
    /// can build partial configs.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULTS_TOML,
            config::FileFormat::Toml,
        ));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BARBER__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        self.scheduling.business_hours()?;
        Ok(())
    }

    /// Address to bind. An unparseable host falls back to loopback.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        SocketAddr::new(ip, self.server.port)
    }

    /// Business hours from the scheduling section, falling back to the
    /// defaults when the section does not validate.
    pub fn business_hours(&self) -> BusinessHours {
        self.scheduling.business_hours().unwrap_or_default()
    }

    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }
}
