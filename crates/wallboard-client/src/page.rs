//! Page-level settings resolved before the refresh loop starts.

use wallboard_core::config::WallboardConfig;
use wallboard_core::refresh::CycleOutcome;
use wallboard_core::render::Layout;

/// `<body>` attribute selecting the layout (`roster` or `summary`).
pub const LAYOUT_ATTRIBUTE: &str = "data-wallboard";

/// Milliseconds between countdown ticks.
pub const TICK_MS: i32 = 1000;

/// Build the page config from the body attribute and the stored endpoint.
/// Unknown or absent layout names fall back to the roster layout.
pub fn page_config(layout_attr: Option<&str>, stored_endpoint: Option<String>) -> WallboardConfig {
    let layout = layout_attr
        .and_then(Layout::from_str_opt)
        .unwrap_or_default();
    WallboardConfig {
        layout,
        ..WallboardConfig::default()
    }
    .with_stored_endpoint(stored_endpoint)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,
    Warn,
    Error,
}

/// Console lines describing how a refresh cycle ended.
pub fn outcome_lines(outcome: &CycleOutcome) -> Vec<(LogLevel, String)> {
    match outcome {
        CycleOutcome::Rendered(report) => report
            .missing
            .iter()
            .map(|id| (LogLevel::Warn, format!("Element with ID '{id}' not found")))
            .chain(std::iter::once((LogLevel::Log, "Wallboard updated".to_string())))
            .collect(),
        CycleOutcome::FetchFailed(e) => {
            vec![(LogLevel::Error, format!("Error fetching data: {e}"))]
        },
        CycleOutcome::RenderAborted(e) => {
            vec![(LogLevel::Error, format!("Error updating wallboard: {e}"))]
        },
    }
}
