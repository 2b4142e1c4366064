pub mod agents;
pub mod config;
pub mod countdown;
pub mod format;
pub mod refresh;
pub mod render;
pub mod snapshot;
pub mod surface;
pub mod thresholds;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::render::Layout;
    use crate::snapshot::{AgentRecord, WallboardSnapshot};
    use crate::surface::MemorySurface;

    /// Create an agent record with the given name and state.
    pub fn make_agent(first: &str, last: &str, status: &str, on_contacts: bool) -> AgentRecord {
        AgentRecord {
            id: format!("{}-{}", first.to_lowercase(), last.to_lowercase()),
            arn: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            status: Some(status.to_string()),
            on_contacts,
        }
    }

    /// Create a fully populated snapshot with the given queue length.
    pub fn make_snapshot(calls_in_queue: u64) -> WallboardSnapshot {
        let users = vec![
            make_agent("Ada", "Lovelace", "Available", false),
            make_agent("Grace", "Hopper", "Available", true),
            make_agent("Alan", "Turing", "Break", false),
        ];
        let agent_statuses = users.iter().filter_map(|u| u.status.clone()).collect();
        WallboardSnapshot {
            calls_handled: Some(42),
            calls_in_queue: Some(calls_in_queue),
            calls_abandoned: Some(3),
            longest_wait_time: Some(125_000.0),
            agent_answer_rate: Some(87.5),
            average_contact_duration: Some(245.0),
            custom_information: Some("Storm warning: expect high volume".to_string()),
            users: Some(users),
            agent_statuses: Some(agent_statuses),
            number_of_agents: Some(3),
            start_hours_ago: Some("24".to_string()),
            agents_online: Some(3),
            agents_on_call: Some(1),
            agents_on_contact: Some(1),
        }
    }

    /// An in-memory surface carrying every element the given layout writes to.
    pub fn surface_for(layout: Layout) -> MemorySurface {
        MemorySurface::with_targets(layout.targets())
    }
}
