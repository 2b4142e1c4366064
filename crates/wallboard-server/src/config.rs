use serde::Deserialize;

use wallboard_core::render::DEFAULT_CUSTOM_INFORMATION;

/// Top-level server configuration, loaded from `wallboard.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub connect: ConnectConfig,
    /// Window used when a request carries no usable `StartHoursAgo`.
    pub default_start_hours: i64,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            web_root: "web".to_string(),
            connect: ConnectConfig::default(),
            default_start_hours: 24,
            request_timeout_secs: 10,
        }
    }
}

/// Contact-center instance and the metric export that stands in for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    pub instance_id: Option<String>,
    /// Comma-separated queue ARNs.
    pub queue_arns: Option<String>,
    /// JSON metric export read on every request.
    pub metrics_file: String,
    pub wallboard_message: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            queue_arns: None,
            metrics_file: "metrics.json".to_string(),
            wallboard_message: DEFAULT_CUSTOM_INFORMATION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Validate configuration, logging warnings for issues.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }
        if self.request_timeout_secs == 0 {
            tracing::error!("request_timeout_secs must be > 0");
            std::process::exit(1);
        }
        if self.connect.instance_id.is_none() || self.connect.queue_arns.is_none() {
            tracing::warn!(
                "connect.instance_id or connect.queue_arns is not set; /wallboard will answer 500"
            );
        }
        if !std::path::Path::new(&self.connect.metrics_file).exists() {
            tracing::warn!(file = %self.connect.metrics_file, "metric export not found");
        }
    }

    /// Load config from the file named by `WALLBOARD_CONFIG` (default
    /// `wallboard.toml`) if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("WALLBOARD_CONFIG").unwrap_or_else(|_| "wallboard.toml".into());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("WALLBOARD_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("WALLBOARD_WEB_ROOT")
            && !root.is_empty()
        {
            config.web_root = root;
        }
        if let Ok(id) = std::env::var("WALLBOARD_INSTANCE_ID")
            && !id.is_empty()
        {
            config.connect.instance_id = Some(id);
        }
        if let Ok(arns) = std::env::var("WALLBOARD_QUEUE_ARNS")
            && !arns.is_empty()
        {
            config.connect.queue_arns = Some(arns);
        }
        if let Ok(file) = std::env::var("WALLBOARD_METRICS_FILE")
            && !file.is_empty()
        {
            config.connect.metrics_file = file;
        }
        if let Ok(message) = std::env::var("WALLBOARD_MESSAGE")
            && !message.is_empty()
        {
            config.connect.wallboard_message = message;
        }
        if let Ok(val) = std::env::var("WALLBOARD_REQUEST_TIMEOUT_SECS")
            && let Ok(n) = val.parse::<u64>()
        {
            config.request_timeout_secs = n;
        }

        config
    }
}
