//! Bootstrapper configuration loading from file and environment variables.

use appauth_api::AuthConfig;
use appauth_db::DbRuntimeSettings;
use appauth_platform::PlatformConfig;
use appauth_types::AppConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The application to authenticate.
    #[serde(default)]
    pub app: AppConfig,

    /// Authentication backend.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Host client bridge.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// User cache database.
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_cache_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "appauth_bootstrap=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_cache_path() -> String {
    "appauth.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl CacheConfig {
    pub fn settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist.
///
/// Environment variable overrides:
/// - `APPAUTH_APP_ID` overrides `app.app_id`
/// - `APPAUTH_AUTH_URL` overrides `auth.base_url`
/// - `APPAUTH_PLATFORM_URL` overrides `platform.base_url`
/// - `APPAUTH_CACHE_PATH` overrides `cache.path`
/// - `APPAUTH_LOG_LEVEL` overrides `logging.level`
/// - `APPAUTH_LOG_JSON` overrides `logging.json` ("true" or "1" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Applies `APPAUTH_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(app_id) = lookup("APPAUTH_APP_ID") {
        config.app.app_id = app_id;
    }
    if let Some(url) = lookup("APPAUTH_AUTH_URL") {
        config.auth.base_url = url;
    }
    if let Some(url) = lookup("APPAUTH_PLATFORM_URL") {
        config.platform.base_url = url;
    }
    if let Some(path) = lookup("APPAUTH_CACHE_PATH") {
        config.cache.path = path;
    }
    if let Some(level) = lookup("APPAUTH_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("APPAUTH_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    config
}
