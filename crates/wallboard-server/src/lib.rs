pub mod api;
pub mod config;
pub mod connect;
pub mod error;
pub mod health;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use config::ServerConfig;
use state::AppState;

/// Headers browsers may send on cross-origin snapshot requests.
const CORS_ALLOWED_HEADERS: [&str; 5] = [
    "content-type",
    "x-amz-date",
    "authorization",
    "x-api-key",
    "x-amz-security-token",
];

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(CORS_ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_credentials(false)
}

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let web_root = config.web_root.clone();
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let state = AppState::new(config);

    // Snapshot route: cross-origin and never cached
    let wallboard_routes = Router::new()
        .route("/wallboard", get(api::get_wallboard))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors_layer());

    let app = Router::new()
        .merge(wallboard_routes)
        .route("/health", get(health::health_check))
        .fallback_service(ServeDir::new(&web_root))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state.clone());

    (app, state)
}
