use serde::{Deserialize, Serialize};

/// Class applied to a container whose metric crossed its alert threshold.
pub const ALERT_CLASS: &str = "alert";
/// Class applied to the queue container between the warn and alert thresholds.
pub const WARN_CLASS: &str = "warn";

/// Styling tier for the queue container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueLevel {
    #[default]
    Normal,
    Warn,
    Alert,
}

impl QueueLevel {
    pub fn is_alert(self) -> bool {
        self == Self::Alert
    }

    pub fn is_warn(self) -> bool {
        self == Self::Warn
    }
}

/// Alert cutoffs. A value at or above a cutoff triggers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub call_alert: u64,
    pub call_warn: u64,
    /// Milliseconds.
    pub wait_time_alert: u64,
    pub abandonment_alert: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            call_alert: 10,
            call_warn: 5,
            wait_time_alert: 300_000,
            abandonment_alert: 10,
        }
    }
}

impl Thresholds {
    /// Two-tier step function over the queue length. A missing count is `Normal`.
    pub fn queue_level(&self, calls_in_queue: Option<u64>) -> QueueLevel {
        match calls_in_queue {
            Some(n) if n >= self.call_alert => QueueLevel::Alert,
            Some(n) if n >= self.call_warn => QueueLevel::Warn,
            _ => QueueLevel::Normal,
        }
    }

    pub fn wait_time_exceeded(&self, longest_wait_ms: Option<f64>) -> bool {
        longest_wait_ms.is_some_and(|ms| ms >= self.wait_time_alert as f64)
    }

    pub fn abandonment_exceeded(&self, calls_abandoned: Option<u64>) -> bool {
        calls_abandoned.is_some_and(|n| n >= self.abandonment_alert)
    }
}
