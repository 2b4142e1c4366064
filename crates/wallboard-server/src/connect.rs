//! Snapshot assembly from a contact-center metric export.
//!
//! The export mirrors the shape of the contact-center metric APIs: current
//! and historical metric responses whose collections are read by position,
//! a user-data listing, and per-user identity details.

use std::collections::HashMap;

use serde::Deserialize;

use wallboard_core::snapshot::{AgentRecord, WallboardSnapshot};

use crate::config::ConnectConfig;

/// Positions of the current metrics in the export's collections.
pub mod current {
    pub const CONTACTS_IN_QUEUE: usize = 0;
    pub const OLDEST_CONTACT_AGE: usize = 1;
    pub const AGENTS_ONLINE: usize = 2;
    pub const AGENTS_ON_CALL: usize = 3;
    pub const AGENTS_ON_CONTACT: usize = 4;
}

/// Positions of the historical metrics in the export's collections.
pub mod historical {
    pub const CONTACTS_HANDLED: usize = 0;
    pub const CONTACTS_ABANDONED: usize = 1;
    pub const AVG_CONTACT_DURATION: usize = 2;
    pub const AGENT_ANSWER_RATE: usize = 3;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    MissingInstanceId,
    MissingQueueArns,
    NoQueueIds,
    NoInstanceArn,
    Export(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInstanceId => write!(f, "connect.instance_id is required"),
            Self::MissingQueueArns => write!(f, "connect.queue_arns is required"),
            Self::NoQueueIds => write!(f, "Could not extract queue IDs from queue ARNs"),
            Self::NoInstanceArn => write!(f, "Could not extract instance ARN from queue ARN"),
            Self::Export(m) => write!(f, "metric export unavailable: {m}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Instance and queues a snapshot is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub instance_id: String,
    pub instance_arn: String,
    pub queues: Vec<String>,
}

impl ConnectTarget {
    pub fn from_config(config: &ConnectConfig) -> Result<Self, SnapshotError> {
        let instance_id = config
            .instance_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(SnapshotError::MissingInstanceId)?;
        let arns = config
            .queue_arns
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(SnapshotError::MissingQueueArns)?;

        let queues = queue_ids(arns);
        if queues.is_empty() {
            return Err(SnapshotError::NoQueueIds);
        }
        let first = arns.split(',').next().unwrap_or_default().trim();
        let instance_arn = instance_arn(first).ok_or(SnapshotError::NoInstanceArn)?;

        Ok(Self {
            instance_id: instance_id.trim().to_string(),
            instance_arn,
            queues,
        })
    }
}

/// Queue ids from a comma-separated ARN list. Blank entries are skipped.
pub fn queue_ids(arns: &str) -> Vec<String> {
    arns.split(',')
        .map(str::trim)
        .filter(|arn| !arn.is_empty())
        .filter_map(|arn| {
            let id = queue_id(arn);
            if id.is_none() {
                tracing::warn!(arn, "Could not extract queue ID from ARN");
            }
            id
        })
        .collect()
}

/// The final `/` segment of a queue ARN.
pub fn queue_id(arn: &str) -> Option<String> {
    arn.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// The part of a queue ARN before `/queue/`.
pub fn instance_arn(queue_arn: &str) -> Option<String> {
    queue_arn
        .split_once("/queue/")
        .map(|(instance, _)| instance)
        .filter(|instance| !instance.is_empty())
        .map(str::to_string)
}

/// Resolve the reporting window. Returns the hours used and the value to
/// echo back: the raw parameter when present, otherwise the default.
pub fn parse_start_hours(raw: Option<&str>, default: i64) -> (i64, String) {
    let Some(raw) = raw else {
        return (default, default.to_string());
    };
    let hours = match raw.trim() {
        "" => default,
        s => s.parse::<i64>().unwrap_or_else(|_| {
            tracing::warn!(value = raw, default, "Invalid StartHoursAgo value, using default");
            default
        }),
    };
    (hours, raw.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricExport {
    pub current_metrics: MetricResponse,
    pub historical_metrics: MetricResponse,
    /// Kept raw so a malformed user listing only drops the roster.
    pub user_data: serde_json::Value,
    /// Identity details keyed by user id.
    pub identities: HashMap<String, IdentityInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricResponse {
    pub metric_results: Vec<MetricResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricResult {
    pub collections: Vec<MetricCollection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricCollection {
    pub metric: MetricInfo,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricInfo {
    pub name: String,
    pub unit: Option<String>,
}

impl MetricResponse {
    /// Value at `index` in the first result, or 0 when anything is missing.
    pub fn value(&self, index: usize) -> f64 {
        self.metric_results
            .first()
            .and_then(|r| r.collections.get(index))
            .and_then(|c| c.value)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    fn count(&self, index: usize) -> u64 {
        self.value(index).max(0.0).trunc() as u64
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserDataResponse {
    pub user_data_list: Vec<UserData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserData {
    pub user: UserReference,
    pub status: Option<AgentStatus>,
    pub contacts: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserReference {
    pub id: String,
    pub arn: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AgentStatus {
    pub status_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IdentityInfo {
    pub first_name: String,
    pub last_name: String,
}

impl MetricExport {
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(content).map_err(|e| SnapshotError::Export(e.to_string()))
    }

    /// Agent records and their status names. Every listed user must have an
    /// identity entry; otherwise the whole roster is rejected.
    pub fn agents(&self) -> Result<(Vec<AgentRecord>, Vec<String>), String> {
        if self.user_data.is_null() {
            return Ok((Vec::new(), Vec::new()));
        }
        let listing = UserDataResponse::deserialize(&self.user_data).map_err(|e| e.to_string())?;

        let mut users = Vec::with_capacity(listing.user_data_list.len());
        let mut statuses = Vec::new();
        for entry in listing.user_data_list {
            let identity = self
                .identities
                .get(&entry.user.id)
                .ok_or_else(|| format!("no identity for user '{}'", entry.user.id))?;
            let status = entry.status.and_then(|s| s.status_name);
            if let Some(name) = &status {
                statuses.push(name.clone());
            }
            users.push(AgentRecord {
                id: entry.user.id,
                arn: entry.user.arn,
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
                status,
                on_contacts: !entry.contacts.is_empty(),
            });
        }
        Ok((users, statuses))
    }
}

/// Build the snapshot served to wallboard pages.
pub fn assemble_snapshot(
    target: &ConnectTarget,
    export: &MetricExport,
    message: &str,
    start_hours_echo: String,
) -> WallboardSnapshot {
    let cur = &export.current_metrics;
    let hist = &export.historical_metrics;

    let (users, statuses) = export.agents().unwrap_or_else(|e| {
        tracing::warn!(instance = %target.instance_id, error = %e, "Error getting agent statuses");
        (Vec::new(), Vec::new())
    });

    WallboardSnapshot {
        calls_handled: Some(hist.count(historical::CONTACTS_HANDLED)),
        calls_in_queue: Some(cur.count(current::CONTACTS_IN_QUEUE)),
        calls_abandoned: Some(hist.count(historical::CONTACTS_ABANDONED)),
        // Exported in seconds, served in milliseconds.
        longest_wait_time: Some(cur.value(current::OLDEST_CONTACT_AGE) * 1000.0),
        agent_answer_rate: Some(hist.value(historical::AGENT_ANSWER_RATE)),
        average_contact_duration: Some(hist.value(historical::AVG_CONTACT_DURATION)),
        custom_information: Some(message.to_string()),
        number_of_agents: Some(statuses.len() as u64),
        agent_statuses: Some(statuses),
        users: Some(users),
        start_hours_ago: Some(start_hours_echo),
        agents_online: Some(cur.count(current::AGENTS_ONLINE)),
        agents_on_call: Some(cur.count(current::AGENTS_ON_CALL)),
        agents_on_contact: Some(cur.count(current::AGENTS_ON_CONTACT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN_A: &str = "arn:aws:connect:eu-west-2:123456789012:instance/inst-1/queue/q-a";
    const ARN_B: &str = "arn:aws:connect:eu-west-2:123456789012:instance/inst-1/queue/q-b";

    fn export() -> MetricExport {
        MetricExport::from_json(
            r#"{
  "CurrentMetrics": {"MetricResults": [{"Collections": [
    {"Metric": {"Name": "CONTACTS_IN_QUEUE", "Unit": "COUNT"}, "Value": 4.0},
    {"Metric": {"Name": "OLDEST_CONTACT_AGE", "Unit": "SECONDS"}, "Value": 95.0},
    {"Metric": {"Name": "AGENTS_ONLINE", "Unit": "COUNT"}, "Value": 2.0}
  ]}]},
  "HistoricalMetrics": {"MetricResults": [{"Collections": [
    {"Metric": {"Name": "CONTACTS_HANDLED"}, "Value": 120.0},
    {"Metric": {"Name": "CONTACTS_ABANDONED"}, "Value": 6.0},
    {"Metric": {"Name": "AVG_CONTACT_DURATION"}, "Value": 182.5},
    {"Metric": {"Name": "AGENT_ANSWER_RATE"}, "Value": 93.25}
  ]}]},
  "UserData": {"UserDataList": [
    {"User": {"Id": "u1", "Arn": "arn:u1"}, "Status": {"StatusName": "Available"}, "Contacts": []},
    {"User": {"Id": "u2", "Arn": "arn:u2"}, "Status": {"StatusName": "Busy"}, "Contacts": [{"ContactId": "c1"}]},
    {"User": {"Id": "u3", "Arn": "arn:u3"}, "Contacts": []}
  ]},
  "Identities": {
    "u1": {"FirstName": "Ada", "LastName": "Lovelace"},
    "u2": {"FirstName": "Grace", "LastName": "Hopper"},
    "u3": {"FirstName": "Alan", "LastName": "Turing"}
  }
}"#,
        )
        .unwrap()
    }

    fn target() -> ConnectTarget {
        ConnectTarget::from_config(&ConnectConfig {
            instance_id: Some("inst-1".into()),
            queue_arns: Some(format!("{ARN_A}, ,{ARN_B}")),
            ..ConnectConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn queue_and_instance_from_arns() {
        let t = target();
        assert_eq!(t.queues, vec!["q-a", "q-b"]);
        assert_eq!(
            t.instance_arn,
            "arn:aws:connect:eu-west-2:123456789012:instance/inst-1"
        );
        assert_eq!(instance_arn("arn:without-queue"), None);
        assert_eq!(queue_id("arn:trailing/"), None);
    }

    #[test]
    fn missing_config_is_an_error() {
        let no_instance = ConnectConfig {
            queue_arns: Some(ARN_A.into()),
            ..ConnectConfig::default()
        };
        assert_eq!(
            ConnectTarget::from_config(&no_instance),
            Err(SnapshotError::MissingInstanceId)
        );
        let no_queues = ConnectConfig {
            instance_id: Some("inst-1".into()),
            queue_arns: Some(" , ".into()),
            ..ConnectConfig::default()
        };
        assert_eq!(
            ConnectTarget::from_config(&no_queues),
            Err(SnapshotError::NoQueueIds)
        );
        let not_a_queue = ConnectConfig {
            instance_id: Some("inst-1".into()),
            queue_arns: Some("arn:aws:connect:x:1:instance/inst-1/agent/a1".into()),
            ..ConnectConfig::default()
        };
        assert_eq!(
            ConnectTarget::from_config(&not_a_queue),
            Err(SnapshotError::NoInstanceArn)
        );
    }

    #[test]
    fn start_hours_fallbacks() {
        assert_eq!(parse_start_hours(None, 24), (24, "24".to_string()));
        assert_eq!(parse_start_hours(Some("8"), 24), (8, "8".to_string()));
        assert_eq!(parse_start_hours(Some(""), 24), (24, String::new()));
        assert_eq!(parse_start_hours(Some("abc"), 24), (24, "abc".to_string()));
        assert_eq!(parse_start_hours(Some("1.5"), 24), (24, "1.5".to_string()));
    }

    #[test]
    fn missing_metrics_read_as_zero() {
        let e = export();
        assert_eq!(e.current_metrics.value(current::AGENTS_ON_CALL), 0.0);
        assert_eq!(MetricResponse::default().value(0), 0.0);
    }

    #[test]
    fn assembles_snapshot() {
        let snap = assemble_snapshot(&target(), &export(), "Hello floor", "12".into());
        assert_eq!(snap.calls_in_queue, Some(4));
        assert_eq!(snap.longest_wait_time, Some(95_000.0));
        assert_eq!(snap.calls_handled, Some(120));
        assert_eq!(snap.calls_abandoned, Some(6));
        assert_eq!(snap.average_contact_duration, Some(182.5));
        assert_eq!(snap.agent_answer_rate, Some(93.25));
        assert_eq!(snap.agents_online, Some(2));
        assert_eq!(snap.agents_on_contact, Some(0));
        assert_eq!(snap.custom_information.as_deref(), Some("Hello floor"));
        assert_eq!(snap.start_hours_ago.as_deref(), Some("12"));

        let users = snap.agents();
        assert_eq!(users.len(), 3);
        assert_eq!(users[1].first_name, "Grace");
        assert!(users[1].on_contacts);
        assert_eq!(users[2].status, None);
        assert_eq!(snap.statuses(), ["Available", "Busy"]);
        assert_eq!(snap.number_of_agents, Some(2));
    }

    #[test]
    fn missing_identity_drops_roster_only() {
        let mut e = export();
        e.identities.remove("u2");
        let snap = assemble_snapshot(&target(), &e, "", "24".into());
        assert!(snap.agents().is_empty());
        assert!(snap.statuses().is_empty());
        assert_eq!(snap.number_of_agents, Some(0));
        assert_eq!(snap.calls_in_queue, Some(4));
    }

    #[test]
    fn malformed_user_listing_drops_roster_only() {
        let mut e = export();
        e.user_data = serde_json::json!({"UserDataList": "nope"});
        assert!(e.agents().is_err());
        let snap = assemble_snapshot(&target(), &e, "", "24".into());
        assert!(snap.agents().is_empty());
    }
}
