use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "blackhole.toml";
pub const ENV_PREFIX: &str = "BLACKHOLE";

/// Paths served by the inspector itself
const RESERVED_PATHS: [&str; 3] = ["/", "/favicon.ico", "/_health"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub console: ConsoleConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Maximum number of captured requests kept in memory
    pub capacity: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Mirror every captured request to stdout
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

/// Values supplied on the command line; they win over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub capacity: Option<i64>,
    pub console: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("store capacity must be a positive integer, got {0}")]
    InvalidCapacity(i64),
    #[error("invalid listen address '{0}'")]
    InvalidListenAddress(String),
    #[error("server.max_body_bytes must be at least 1")]
    InvalidBodyLimit,
    #[error("unsupported log format '{0}' (expected 'text' or 'json')")]
    InvalidLogFormat(String),
    #[error("metrics endpoint must be an absolute path other than '/', '/favicon.ico' and '/_health', got '{0}'")]
    InvalidMetricsEndpoint(String),
    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

impl ServerConfig {
    pub fn ip(&self) -> Result<IpAddr, ConfigError> {
        self.host
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.host.clone()))
    }
}

impl StoreConfig {
    pub fn capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        usize::try_from(self.capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(ConfigError::InvalidCapacity(self.capacity))
    }
}

/// Load configuration from defaults, the optional TOML file at `path`,
/// `BLACKHOLE__*` environment variables and finally command-line overrides.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.log_level", "info")?
        .set_default("server.log_format", "text")?
        .set_default("server.max_body_bytes", 10 * 1024 * 1024)?
        .set_default("store.capacity", 100)?
        .set_default("console.enabled", false)?
        .set_default("metrics.enabled", true)?
        .set_default("metrics.endpoint", "/_metrics")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("server.host", overrides.host.clone())?
        .set_override_option("server.port", overrides.port.map(i64::from))?
        .set_override_option("store.capacity", overrides.capacity)?
        .set_override_option("console.enabled", overrides.console.then_some(true))?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    cfg.store.capacity()?;
    cfg.server.ip()?;

    if cfg.server.max_body_bytes == 0 {
        return Err(ConfigError::InvalidBodyLimit);
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
    }

    let endpoint = cfg.metrics.endpoint.as_str();
    if cfg.metrics.enabled && (!endpoint.starts_with('/') || RESERVED_PATHS.contains(&endpoint)) {
        return Err(ConfigError::InvalidMetricsEndpoint(cfg.metrics.endpoint.clone()));
    }

    Ok(())
}
