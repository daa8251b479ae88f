//! appauth-bootstrap binary: runs one application authentication handshake.
//!
//! Exits with status 0 once the user's identity is cached, 1 otherwise.

use appauth_api::HttpAuthApi;
use appauth_bootstrap::config::{self, Config};
use appauth_bootstrap::Bootstrapper;
use appauth_cache::SqliteUserCache;
use appauth_platform::HttpPlatformGateway;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("APPAUTH_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("appauth.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration: check the config file syntax");

    init_tracing(&config);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let cache = SqliteUserCache::open(&config.cache.path, config.cache.settings())
        .expect("failed to open user cache: check cache.path in config");
    let platform = HttpPlatformGateway::new(&config.platform)
        .expect("failed to build platform gateway client");
    let auth = HttpAuthApi::new(&config.auth, config.platform.base_url.clone())
        .expect("failed to build auth API client");

    let bootstrapper = Bootstrapper::new(Arc::new(platform), Arc::new(auth), Arc::new(cache));

    // The failure itself is already logged by the bootstrapper.
    match bootstrapper.init_app(&config.app).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
