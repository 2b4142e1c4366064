use tracing_subscriber::EnvFilter;

use wallboard_server::build_app;
use wallboard_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // WALLBOARD_LOG_FORMAT=json switches to structured log lines
    let subscriber = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if std::env::var("WALLBOARD_LOG_FORMAT").is_ok_and(|f| f == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = ServerConfig::load();
    config.validate();
    tracing::info!(
        addr = %config.listen_addr,
        web_root = %config.web_root,
        source = %config.connect.metrics_file,
        "Wallboard server starting"
    );

    let addr = config.listen_addr.clone();
    let (app, _state) = build_app(config);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        },
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
