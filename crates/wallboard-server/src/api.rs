use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use wallboard_core::snapshot::WallboardSnapshot;

use crate::connect::{
    ConnectTarget, MetricExport, SnapshotError, assemble_snapshot, parse_start_hours,
};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WallboardQuery {
    #[serde(rename = "StartHoursAgo")]
    pub start_hours_ago: Option<String>,
}

/// GET /wallboard: current queue metrics and agent roster.
pub async fn get_wallboard(
    State(state): State<AppState>,
    Query(query): Query<WallboardQuery>,
) -> Result<Json<WallboardSnapshot>, AppError> {
    let (hours, echo) = parse_start_hours(
        query.start_hours_ago.as_deref(),
        state.config.default_start_hours,
    );

    let result = load_snapshot(&state, echo).await;
    match &result {
        Ok(snapshot) => tracing::debug!(
            start_hours = hours,
            calls_in_queue = ?snapshot.calls_in_queue,
            agents = snapshot.agents().len(),
            "Returning wallboard snapshot"
        ),
        Err(e) => tracing::error!(error = %e, "Failed to build wallboard snapshot"),
    }
    Ok(Json(result?))
}

async fn load_snapshot(
    state: &AppState,
    start_hours_echo: String,
) -> Result<WallboardSnapshot, SnapshotError> {
    let connect = &state.config.connect;
    let target = ConnectTarget::from_config(connect)?;
    let content = tokio::fs::read_to_string(&connect.metrics_file)
        .await
        .map_err(|e| SnapshotError::Export(format!("{}: {e}", connect.metrics_file)))?;
    let export = MetricExport::from_json(&content)?;
    Ok(assemble_snapshot(
        &target,
        &export,
        &connect.wallboard_message,
        start_hours_echo,
    ))
}
