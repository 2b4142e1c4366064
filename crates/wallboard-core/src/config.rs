use serde::{Deserialize, Serialize};

use crate::render::Layout;
use crate::thresholds::Thresholds;

/// Compiled-in endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/wallboard";

/// Browser storage key holding an endpoint override.
pub const ENDPOINT_STORAGE_KEY: &str = "apiEndpoint";

/// Wallboard page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallboardConfig {
    pub endpoint: String,
    pub layout: Layout,
    /// Seconds between successful refreshes.
    pub update_interval_secs: u32,
    pub request_timeout_ms: u64,
    pub thresholds: Thresholds,
    /// Style the queue as if this many calls were waiting (debugging aid).
    pub debug_queue_override: Option<u64>,
}

impl Default for WallboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            layout: Layout::default(),
            update_interval_secs: 10,
            request_timeout_ms: 10_000,
            thresholds: Thresholds::default(),
            debug_queue_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(m) => write!(f, "failed to parse wallboard config: {m}"),
            Self::Invalid(m) => write!(f, "invalid wallboard config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl WallboardConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply an endpoint read from browser storage. Only layouts that read
    /// stored endpoints honour it; blank values are ignored.
    pub fn with_stored_endpoint(mut self, stored: Option<String>) -> Self {
        if !self.layout.reads_stored_endpoint() {
            return self;
        }
        if let Some(endpoint) = stored.map(|s| s.trim().to_string())
            && !endpoint.is_empty()
        {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be > 0".into(),
            ));
        }
        if self.thresholds.call_warn > self.thresholds.call_alert {
            tracing::warn!(
                warn = self.thresholds.call_warn,
                alert = self.thresholds.call_alert,
                "call_warn is above call_alert; the warn tier will never show"
            );
        }
        Ok(())
    }
}
