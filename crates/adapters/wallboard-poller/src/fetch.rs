use std::time::Duration;

use wallboard_core::config::WallboardConfig;
use wallboard_core::refresh::FetchError;
use wallboard_core::snapshot::WallboardSnapshot;

/// Somewhere the poller can fetch snapshots from.
pub trait SnapshotSource {
    /// Where snapshots come from, for logging.
    fn endpoint(&self) -> &str;

    fn fetch_snapshot(
        &self,
    ) -> impl Future<Output = Result<WallboardSnapshot, FetchError>> + Send;
}

/// HTTP client for the snapshot endpoint.
pub struct SnapshotClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SnapshotClient {
    pub fn new(config: &WallboardConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wallboard-poller/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self) -> Result<WallboardSnapshot, FetchError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(classify)?;

        if !resp.status().is_success() {
            return Err(FetchError::Http(resp.status().as_u16()));
        }

        let body = resp.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl SnapshotSource for SnapshotClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_snapshot(&self) -> Result<WallboardSnapshot, FetchError> {
        self.fetch().await
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}
