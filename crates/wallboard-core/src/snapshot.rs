use serde::{Deserialize, Deserializer, Serialize};

/// One polled payload describing current queue metrics and agent states.
///
/// Every field is optional on the wire; absent and `null` values both
/// deserialize to `None` and render as the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WallboardSnapshot {
    #[serde(deserialize_with = "lenient_count")]
    pub calls_handled: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub calls_in_queue: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub calls_abandoned: Option<u64>,
    /// Age of the oldest queued contact, in milliseconds.
    pub longest_wait_time: Option<f64>,
    /// Percentage, 0-100.
    pub agent_answer_rate: Option<f64>,
    /// Seconds.
    pub average_contact_duration: Option<f64>,
    pub custom_information: Option<String>,
    pub users: Option<Vec<AgentRecord>>,
    pub agent_statuses: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_count")]
    pub number_of_agents: Option<u64>,
    pub start_hours_ago: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub agents_online: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub agents_on_call: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub agents_on_contact: Option<u64>,
}

impl WallboardSnapshot {
    /// Agent records, empty when the payload carried none.
    pub fn agents(&self) -> &[AgentRecord] {
        self.users.as_deref().unwrap_or_default()
    }

    /// Flat per-agent status labels, empty when the payload carried none.
    pub fn statuses(&self) -> &[String] {
        self.agent_statuses.as_deref().unwrap_or_default()
    }
}

/// A single agent as reported by the snapshot endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AgentRecord {
    pub id: String,
    pub arn: String,
    pub first_name: String,
    pub last_name: String,
    pub status: Option<String>,
    pub on_contacts: bool,
}

/// Accepts counts as integers, whole or fractional floats (truncated toward
/// zero, negatives clamp to zero), numeric strings, or `null`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                Ok(Some(v))
            } else if let Some(v) = n.as_f64() {
                Ok(Some(v.max(0.0).trunc() as u64))
            } else {
                Ok(Some(0))
            }
        },
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(|v| Some(v.max(0.0).trunc() as u64))
            .map_err(|_| D::Error::custom(format!("expected a count, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("expected a count, got {other}"))),
    }
}
