use crate::format::PLACEHOLDER;
use crate::snapshot::AgentRecord;

/// Whether an agent is currently handling a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    OnCall,
    Free,
}

impl CallState {
    pub fn label(self) -> &'static str {
        match self {
            Self::OnCall => "On-Call",
            Self::Free => "Free",
        }
    }
}

/// Display-ready projection of an [`AgentRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentView {
    pub initials: String,
    pub full_name: String,
    pub status: String,
    pub call_state: CallState,
}

impl AgentView {
    pub fn from_record(agent: &AgentRecord) -> Self {
        let full_name = format!("{} {}", agent.first_name.trim(), agent.last_name.trim())
            .trim()
            .to_string();
        let status = agent
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER)
            .to_string();
        Self {
            initials: initials(&agent.first_name, &agent.last_name),
            full_name,
            status,
            call_state: if agent.on_contacts {
                CallState::OnCall
            } else {
                CallState::Free
            },
        }
    }
}

/// First character of each name, uppercased.
pub fn initials(first: &str, last: &str) -> String {
    [first, last]
        .iter()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Turn a free-text label into a single CSS class token.
///
/// Returns `None` when nothing usable remains (e.g. the placeholder).
pub fn badge_class(label: &str) -> Option<String> {
    let token: String = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if token.is_empty() || token.chars().all(|c| c == '-') {
        None
    } else {
        Some(token)
    }
}

/// Occurrences of one status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Count status labels, keeping the order in which each was first seen.
pub fn tally_statuses(statuses: &[String]) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for status in statuses {
        if let Some(entry) = counts.iter_mut().find(|e| &e.status == status) {
            entry.count += 1;
        } else {
            counts.push(StatusCount {
                status: status.clone(),
                count: 1,
            });
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_agent;

    #[test]
    fn view_from_record() {
        let view = AgentView::from_record(&make_agent("Grace", "Hopper", "Available", true));
        assert_eq!(view.initials, "GH");
        assert_eq!(view.full_name, "Grace Hopper");
        assert_eq!(view.status, "Available");
        assert_eq!(view.call_state, CallState::OnCall);
        assert_eq!(view.call_state.label(), "On-Call");
    }

    #[test]
    fn free_agent_and_missing_status() {
        let mut agent = make_agent("Alan", "Turing", "", false);
        agent.status = None;
        let view = AgentView::from_record(&agent);
        assert_eq!(view.status, "-");
        assert_eq!(view.call_state.label(), "Free");
    }

    #[test]
    fn initials_handle_missing_and_unicode_names() {
        assert_eq!(initials("émile", "zola"), "ÉZ");
        assert_eq!(initials("", "Solo"), "S");
        assert_eq!(initials("", ""), "");
        assert_eq!(initials("  ada", "lovelace"), "AL");
    }

    #[test]
    fn badge_class_tokens() {
        assert_eq!(badge_class("Available").as_deref(), Some("Available"));
        assert_eq!(badge_class("On-Call").as_deref(), Some("On-Call"));
        assert_eq!(badge_class("Lunch Break").as_deref(), Some("Lunch-Break"));
        assert_eq!(badge_class("a\"><b").as_deref(), Some("ab"));
        assert_eq!(badge_class("-"), None);
        assert_eq!(badge_class("   "), None);
    }

    #[test]
    fn tally_keeps_first_seen_order() {
        let statuses: Vec<String> = [
            "Available",
            "Break",
            "Available",
            "Offline",
            "Break",
            "Available",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let tally = tally_statuses(&statuses);
        assert_eq!(
            tally,
            vec![
                StatusCount {
                    status: "Available".into(),
                    count: 3,
                },
                StatusCount {
                    status: "Break".into(),
                    count: 2,
                },
                StatusCount {
                    status: "Offline".into(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn tally_of_nothing_is_empty() {
        assert!(tally_statuses(&[]).is_empty());
    }
}
