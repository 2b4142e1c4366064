use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Metric export the snapshot endpoint reads.
    pub source: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let source = state.config.connect.metrics_file.clone();
    let status = if std::path::Path::new(&source).exists() {
        "healthy"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        source,
    })
}
