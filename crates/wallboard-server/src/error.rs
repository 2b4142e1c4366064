use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::connect::SnapshotError;

#[derive(Debug)]
pub enum AppError {
    /// Any failure assembling a snapshot. Reported as 500 with the
    /// reason appended to a fixed prefix.
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(m) => write!(f, "An internal server error occurred: {m}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SnapshotError> for AppError {
    fn from(e: SnapshotError) -> Self {
        Self::Internal(e.to_string())
    }
}
