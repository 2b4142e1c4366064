use tracing_subscriber::EnvFilter;

use wallboard_poller::WallboardPoller;

#[tokio::main]
async fn main() {
    // WALLBOARD_LOG_FORMAT=json switches to structured log lines
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    if std::env::var("WALLBOARD_LOG_FORMAT").is_ok_and(|f| f == "json") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match wallboard_poller::config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid poller configuration");
            std::process::exit(1);
        },
    };
    let poller = match WallboardPoller::new(&config) {
        Ok(poller) => poller,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create HTTP client");
            std::process::exit(1);
        },
    };
    poller.run().await;
}
