use serde::Deserialize;

use wallboard_core::config::{ConfigError, WallboardConfig};
use wallboard_core::render::Layout;

/// The `[poller]` section of `wallboard.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PollerFile {
    poller: WallboardConfig,
}

/// Parse the `[poller]` section. A file without one yields defaults.
pub fn from_toml(content: &str) -> Result<WallboardConfig, ConfigError> {
    let file: PollerFile =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    file.poller.validate()?;
    Ok(file.poller)
}

/// Apply `WALLBOARD_*` overrides read through `var`.
pub fn apply_env(
    mut config: WallboardConfig,
    var: impl Fn(&str) -> Option<String>,
) -> WallboardConfig {
    if let Some(endpoint) = var("WALLBOARD_ENDPOINT")
        && !endpoint.is_empty()
    {
        config.endpoint = endpoint;
    }
    if let Some(layout) = var("WALLBOARD_LAYOUT")
        && let Some(layout) = Layout::from_str_opt(&layout)
    {
        config.layout = layout;
    }
    if let Some(val) = var("WALLBOARD_UPDATE_INTERVAL_SECS")
        && let Ok(n) = val.parse::<u32>()
    {
        config.update_interval_secs = n;
    }
    if let Some(val) = var("WALLBOARD_REQUEST_TIMEOUT_MS")
        && let Ok(n) = val.parse::<u64>()
    {
        config.request_timeout_ms = n;
    }
    config
}

/// Load the poller config from `WALLBOARD_CONFIG` (default `wallboard.toml`)
/// if it exists, then apply env var overrides.
pub fn load() -> Result<WallboardConfig, ConfigError> {
    let path = std::env::var("WALLBOARD_CONFIG").unwrap_or_else(|_| "wallboard.toml".into());
    let config = match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg = from_toml(&content)?;
            tracing::info!("Loaded poller configuration from {path}");
            cfg
        },
        Err(_) => {
            tracing::info!("No {path} found, using defaults");
            WallboardConfig::default()
        },
    };
    let config = apply_env(config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
