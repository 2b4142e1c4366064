use serde::{Deserialize, Serialize};

use crate::agents::{AgentView, badge_class, tally_statuses};
use crate::format::{format_count, format_duration, format_percentage, format_time};
use crate::snapshot::WallboardSnapshot;
use crate::surface::{DomOp, Element, LookupMode, Node};
use crate::thresholds::{ALERT_CLASS, Thresholds, WARN_CLASS};

/// Element ids the renderer writes into.
pub mod targets {
    pub const CALLS_HANDLED: &str = "callsHandled";
    pub const CALLS_IN_QUEUE: &str = "callsInQueue";
    pub const CALLS_ABANDONED: &str = "callsAbandoned";
    pub const LONGEST_WAIT_TIME: &str = "longestWaitTime";
    pub const AGENT_ANSWER_RATE: &str = "agentAnswerRate";
    pub const AVERAGE_CONTACT_DURATION: &str = "averageContactDuration";
    pub const CUSTOM_INFORMATION: &str = "customInformation";
    pub const COUNTDOWN: &str = "countdown";
    pub const CALLS_IN_QUEUE_CONTAINER: &str = "callsInQueueContainer";
    pub const LONGEST_WAIT_TIME_CONTAINER: &str = "longestWaitTimeContainer";
    pub const CALLS_ABANDONED_CONTAINER: &str = "callsAbandonedContainer";
    pub const AGENT_STATUS_LIST: &str = "agent-status-list";
    pub const NO_AGENT_MESSAGE: &str = "no-agent-message";
    pub const AGENT_STATUSES: &str = "agentStatuses";
}

/// The endpoint's text when no message is configured. The roster layout hides
/// the custom information panel when it sees this.
pub const DEFAULT_CUSTOM_INFORMATION: &str = "No custom information available.";

/// Page layout, selecting how agents are shown and how strictly the DOM is
/// looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Per-agent badges, threshold styling, defensive lookup.
    #[default]
    Roster,
    /// One line per distinct status with its count, strict lookup.
    Summary,
}

impl Layout {
    pub fn lookup_mode(self) -> LookupMode {
        match self {
            Self::Roster => LookupMode::Defensive,
            Self::Summary => LookupMode::Strict,
        }
    }

    /// Whether the one-second timer is restarted each time a fetch starts.
    pub fn restarts_timer_on_fetch(self) -> bool {
        self == Self::Roster
    }

    /// Whether the endpoint may be overridden from browser storage.
    pub fn reads_stored_endpoint(self) -> bool {
        self == Self::Roster
    }

    /// Every element id this layout writes to.
    pub fn targets(self) -> Vec<&'static str> {
        let mut ids = vec![
            targets::CALLS_HANDLED,
            targets::CALLS_IN_QUEUE,
            targets::CALLS_ABANDONED,
            targets::LONGEST_WAIT_TIME,
            targets::AGENT_ANSWER_RATE,
            targets::AVERAGE_CONTACT_DURATION,
            targets::CUSTOM_INFORMATION,
            targets::COUNTDOWN,
        ];
        match self {
            Self::Roster => ids.extend([
                targets::CALLS_IN_QUEUE_CONTAINER,
                targets::LONGEST_WAIT_TIME_CONTAINER,
                targets::CALLS_ABANDONED_CONTAINER,
                targets::AGENT_STATUS_LIST,
                targets::NO_AGENT_MESSAGE,
            ]),
            Self::Summary => ids.push(targets::AGENT_STATUSES),
        }
        ids
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roster" => Some(Self::Roster),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roster => write!(f, "roster"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Turns a snapshot into the ordered list of DOM writes for one layout.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: Layout,
    thresholds: Thresholds,
    queue_override: Option<u64>,
}

impl Renderer {
    pub fn new(layout: Layout, thresholds: Thresholds) -> Self {
        Self {
            layout,
            thresholds,
            queue_override: None,
        }
    }

    /// Style the queue container as if this many calls were queued. The
    /// displayed count is unaffected.
    pub fn with_queue_override(mut self, calls: Option<u64>) -> Self {
        self.queue_override = calls;
        self
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn render(&self, snapshot: &WallboardSnapshot) -> Vec<DomOp> {
        let mut ops = vec![
            set_text(targets::CALLS_HANDLED, format_count(snapshot.calls_handled)),
            set_text(targets::CALLS_IN_QUEUE, format_count(snapshot.calls_in_queue)),
            set_text(targets::CALLS_ABANDONED, format_count(snapshot.calls_abandoned)),
            set_text(
                targets::LONGEST_WAIT_TIME,
                format_time(snapshot.longest_wait_time),
            ),
            set_text(
                targets::AGENT_ANSWER_RATE,
                format_percentage(snapshot.agent_answer_rate),
            ),
            set_text(
                targets::AVERAGE_CONTACT_DURATION,
                format_duration(snapshot.average_contact_duration),
            ),
        ];

        match self.layout {
            Layout::Roster => {
                self.push_threshold_styles(snapshot, &mut ops);
                push_custom_information(snapshot, &mut ops, |text| {
                    text != DEFAULT_CUSTOM_INFORMATION
                });
                push_roster(snapshot, &mut ops);
            },
            Layout::Summary => {
                push_custom_information(snapshot, &mut ops, |_| true);
                push_status_summary(snapshot, &mut ops);
            },
        }
        ops
    }

    fn push_threshold_styles(&self, snapshot: &WallboardSnapshot, ops: &mut Vec<DomOp>) {
        let queued = self.queue_override.or(snapshot.calls_in_queue);
        let level = self.thresholds.queue_level(queued);
        ops.push(set_class(
            targets::CALLS_IN_QUEUE_CONTAINER,
            ALERT_CLASS,
            level.is_alert(),
        ));
        ops.push(set_class(
            targets::CALLS_IN_QUEUE_CONTAINER,
            WARN_CLASS,
            level.is_warn(),
        ));
        ops.push(set_class(
            targets::LONGEST_WAIT_TIME_CONTAINER,
            ALERT_CLASS,
            self.thresholds.wait_time_exceeded(snapshot.longest_wait_time),
        ));
        ops.push(set_class(
            targets::CALLS_ABANDONED_CONTAINER,
            ALERT_CLASS,
            self.thresholds.abandonment_exceeded(snapshot.calls_abandoned),
        ));
    }
}

fn push_custom_information(
    snapshot: &WallboardSnapshot,
    ops: &mut Vec<DomOp>,
    shown: impl Fn(&str) -> bool,
) {
    match snapshot.custom_information.as_deref() {
        Some(text) if !text.trim().is_empty() && shown(text) => {
            ops.push(set_text(targets::CUSTOM_INFORMATION, text.to_string()));
            ops.push(DomOp::SetVisible {
                target: targets::CUSTOM_INFORMATION,
                visible: true,
            });
        },
        _ => ops.push(DomOp::SetVisible {
            target: targets::CUSTOM_INFORMATION,
            visible: false,
        }),
    }
}

fn push_roster(snapshot: &WallboardSnapshot, ops: &mut Vec<DomOp>) {
    let nodes: Vec<Node> = snapshot
        .agents()
        .iter()
        .map(|agent| agent_fragment(&AgentView::from_record(agent)))
        .collect();
    let empty = nodes.is_empty();
    ops.push(DomOp::ReplaceChildren {
        target: targets::AGENT_STATUS_LIST,
        nodes,
    });
    ops.push(DomOp::SetVisible {
        target: targets::NO_AGENT_MESSAGE,
        visible: empty,
    });
}

/// `div.agent-status` with name, status, and call-state columns.
pub fn agent_fragment(view: &AgentView) -> Node {
    let status_badge = badge(&view.status);
    let call_badge = badge(view.call_state.label());
    Element::new("div")
        .class("agent-status")
        .child(
            Element::new("div")
                .child(
                    Element::new("span")
                        .class("agent-name-badge")
                        .text(view.initials.clone()),
                )
                .text(view.full_name.clone()),
        )
        .child(Element::new("div").child(status_badge))
        .child(Element::new("div").child(call_badge))
        .into()
}

fn badge(label: &str) -> Element {
    let mut el = Element::new("span").class("agent-status-badge");
    if let Some(class) = badge_class(label) {
        el = el.class(class);
    }
    el.text(label)
}

fn push_status_summary(snapshot: &WallboardSnapshot, ops: &mut Vec<DomOp>) {
    let nodes: Vec<Node> = tally_statuses(snapshot.statuses())
        .into_iter()
        .map(|entry| {
            Element::new("li")
                .child(
                    Element::new("span")
                        .class("agent-count")
                        .text(entry.count.to_string()),
                )
                .text(entry.status)
                .into()
        })
        .collect();
    ops.push(DomOp::ReplaceChildren {
        target: targets::AGENT_STATUSES,
        nodes,
    });
}

fn set_text(target: &'static str, text: String) -> DomOp {
    DomOp::SetText { target, text }
}

fn set_class(target: &'static str, class: &'static str, enabled: bool) -> DomOp {
    DomOp::SetClass {
        target,
        class,
        enabled,
    }
}
