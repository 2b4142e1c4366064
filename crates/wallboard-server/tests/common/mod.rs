use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use wallboard_server::build_app;
use wallboard_server::config::{ConnectConfig, ServerConfig};

pub const QUEUE_ARNS: &str = "arn:aws:connect:eu-west-2:123456789012:instance/inst-1/queue/q-a,\
                              arn:aws:connect:eu-west-2:123456789012:instance/inst-1/queue/q-b";

/// A metric export with five queued calls and two agents.
pub const EXPORT_JSON: &str = r#"{
  "CurrentMetrics": {"MetricResults": [{"Collections": [
    {"Metric": {"Name": "CONTACTS_IN_QUEUE"}, "Value": 5.0},
    {"Metric": {"Name": "OLDEST_CONTACT_AGE"}, "Value": 61.0},
    {"Metric": {"Name": "AGENTS_ONLINE"}, "Value": 2.0},
    {"Metric": {"Name": "AGENTS_ON_CALL"}, "Value": 1.0},
    {"Metric": {"Name": "AGENTS_ON_CONTACT"}, "Value": 1.0}
  ]}]},
  "HistoricalMetrics": {"MetricResults": [{"Collections": [
    {"Metric": {"Name": "CONTACTS_HANDLED"}, "Value": 42.0},
    {"Metric": {"Name": "CONTACTS_ABANDONED"}, "Value": 3.0},
    {"Metric": {"Name": "AVG_CONTACT_DURATION"}, "Value": 245.0},
    {"Metric": {"Name": "AGENT_ANSWER_RATE"}, "Value": 87.5}
  ]}]},
  "UserData": {"UserDataList": [
    {"User": {"Id": "u1", "Arn": "arn:u1"}, "Status": {"StatusName": "Available"}, "Contacts": []},
    {"User": {"Id": "u2", "Arn": "arn:u2"}, "Status": {"StatusName": "On Call"}, "Contacts": [{"ContactId": "c1"}]}
  ]},
  "Identities": {
    "u1": {"FirstName": "Ada", "LastName": "Lovelace"},
    "u2": {"FirstName": "Grace", "LastName": "Hopper"}
  }
}"#;

pub struct TestServer {
    pub addr: SocketAddr,
    export: Option<PathBuf>,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server backed by [`EXPORT_JSON`].
    pub async fn new() -> Self {
        let export = write_export(EXPORT_JSON);
        let config = ServerConfig {
            connect: ConnectConfig {
                instance_id: Some("inst-1".to_string()),
                queue_arns: Some(QUEUE_ARNS.to_string()),
                metrics_file: export.display().to_string(),
                wallboard_message: "Team huddle at 3pm".to_string(),
            },
            ..ServerConfig::default()
        };
        Self::from_config(config, Some(export)).await
    }

    /// Start a test server with no instance or queues configured.
    pub async fn unconfigured() -> Self {
        Self::from_config(ServerConfig::default(), None).await
    }

    pub async fn from_config(config: ServerConfig, export: Option<PathBuf>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            export,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn wallboard_url(&self) -> String {
        format!("http://{}/wallboard", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(path) = &self.export {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Write an export to a unique temp file.
pub fn write_export(content: &str) -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "wallboard-export-{}-{}.json",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, content).unwrap();
    path
}
