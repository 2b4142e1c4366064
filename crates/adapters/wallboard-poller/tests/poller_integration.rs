use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::time::Instant;

use wallboard_core::config::WallboardConfig;
use wallboard_core::refresh::{CycleOutcome, FetchError, TickAction};
use wallboard_core::snapshot::WallboardSnapshot;
use wallboard_core::render::{Layout, targets};
use wallboard_core::test_helpers::make_snapshot;
use wallboard_poller::{SnapshotClient, SnapshotSource, WallboardPoller};

async fn spawn_endpoint() -> SocketAddr {
    let app = Router::new()
        .route("/ok", get(|| async { axum::Json(make_snapshot(12)) }))
        .route(
            "/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage", get(|| async { "not json" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                axum::Json(make_snapshot(1))
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // Give the server a moment to start accepting
    tokio::time::sleep(Duration::from_millis(20)).await;
    addr
}

fn config(addr: SocketAddr, path: &str, layout: Layout) -> WallboardConfig {
    WallboardConfig {
        endpoint: format!("http://{addr}{path}"),
        layout,
        request_timeout_ms: 300,
        ..WallboardConfig::default()
    }
}

#[tokio::test]
async fn renders_snapshot_into_surface() {
    let addr = spawn_endpoint().await;
    let mut poller = WallboardPoller::new(&config(addr, "/ok", Layout::Roster)).unwrap();
    assert_eq!(poller.tick(), TickAction::Wait);

    let outcome = poller.fetch_and_render().await;
    assert!(matches!(outcome, CycleOutcome::Rendered(_)));
    let surface = poller.surface();
    assert_eq!(surface.text(targets::CALLS_IN_QUEUE), Some("12"));
    assert_eq!(surface.text(targets::LONGEST_WAIT_TIME), Some("00:02:05"));
    assert_eq!(surface.text(targets::AGENT_ANSWER_RATE), Some("87.50%"));
    assert!(surface.has_class(targets::CALLS_IN_QUEUE_CONTAINER, "alert"));
    assert_eq!(surface.children(targets::AGENT_STATUS_LIST).len(), 3);
    assert_eq!(
        surface.text(targets::COUNTDOWN),
        Some("Next update in 10 seconds")
    );
}

#[tokio::test]
async fn http_error_leaves_surface_untouched() {
    let addr = spawn_endpoint().await;
    let mut poller = WallboardPoller::new(&config(addr, "/fail", Layout::Summary)).unwrap();
    let outcome = poller.fetch_and_render().await;
    assert_eq!(outcome, CycleOutcome::FetchFailed(FetchError::Http(500)));
    assert_eq!(poller.surface().write_count(), 0);
    assert_eq!(poller.refresh_loop().countdown().time_left(), 10);
}

#[tokio::test]
async fn client_classifies_failures() {
    let addr = spawn_endpoint().await;

    let garbage = SnapshotClient::new(&config(addr, "/garbage", Layout::Roster)).unwrap();
    assert!(matches!(garbage.fetch().await, Err(FetchError::Decode(_))));

    let slow = SnapshotClient::new(&config(addr, "/slow", Layout::Roster)).unwrap();
    assert_eq!(slow.fetch().await, Err(FetchError::Timeout));

    let closed = SnapshotClient::new(&WallboardConfig {
        endpoint: "http://127.0.0.1:9/wallboard".to_string(),
        ..WallboardConfig::default()
    })
    .unwrap();
    assert!(matches!(closed.fetch().await, Err(FetchError::Network(_))));
}

#[tokio::test]
async fn snapshot_client_sends_to_configured_endpoint() {
    let addr = spawn_endpoint().await;
    let client = SnapshotClient::new(&config(addr, "/ok", Layout::Roster)).unwrap();
    assert!(client.endpoint().ends_with("/ok"));
    let snapshot = client.fetch().await.unwrap();
    assert_eq!(snapshot, make_snapshot(12));
}

/// Answers from a fixed script, recording when each fetch started.
#[derive(Clone)]
struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Result<WallboardSnapshot, FetchError>>>>,
    fetched_at: Arc<Mutex<Vec<f64>>>,
    origin: Instant,
    latency: Duration,
}

impl ScriptedSource {
    fn new(script: Vec<Result<WallboardSnapshot, FetchError>>, latency: Duration) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fetched_at: Arc::default(),
            origin: Instant::now(),
            latency,
        }
    }

    /// Seconds since creation, to the nearest tenth.
    fn elapsed(&self) -> f64 {
        (self.origin.elapsed().as_millis() as f64 / 100.0).round() / 10.0
    }

    fn fetched_at(&self) -> Vec<f64> {
        self.fetched_at.lock().unwrap().clone()
    }
}

impl SnapshotSource for ScriptedSource {
    fn endpoint(&self) -> &str {
        "scripted"
    }

    async fn fetch_snapshot(&self) -> Result<WallboardSnapshot, FetchError> {
        let started = self.elapsed();
        self.fetched_at.lock().unwrap().push(started);
        tokio::time::sleep(self.latency).await;
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(make_snapshot(1)))
    }
}

fn scripted_config(layout: Layout, interval: u32) -> WallboardConfig {
    WallboardConfig {
        layout,
        update_interval_secs: interval,
        ..WallboardConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn run_fetches_on_startup_and_retries_the_tick_after_a_failure() {
    for layout in [Layout::Roster, Layout::Summary] {
        let source = ScriptedSource::new(
            vec![
                Ok(make_snapshot(2)),
                Err(FetchError::Http(500)),
                Ok(make_snapshot(12)),
                Ok(make_snapshot(7)),
            ],
            Duration::ZERO,
        );
        let mut poller = WallboardPoller::with_source(&scripted_config(layout, 3), source.clone());
        poller.run_ticks(7).await;

        // Due at t=3, which fails; the very next tick retries.
        assert_eq!(source.fetched_at(), vec![0.0, 3.0, 4.0, 7.0], "{layout}");
        assert_eq!(poller.surface().text(targets::CALLS_IN_QUEUE), Some("7"));
        assert_eq!(
            poller.surface().text(targets::COUNTDOWN),
            Some("Next update in 3 seconds")
        );
        assert!(!poller.refresh_loop().is_in_flight());
    }
}

#[tokio::test(start_paused = true)]
async fn first_tick_comes_a_second_after_startup() {
    let source = ScriptedSource::new(vec![], Duration::ZERO);
    let mut poller =
        WallboardPoller::with_source(&scripted_config(Layout::Summary, 10), source.clone());
    poller.run_ticks(1).await;
    assert_eq!(source.elapsed(), 1.0);
    assert_eq!(
        poller.surface().text(targets::COUNTDOWN),
        Some("Next update in 9 seconds")
    );
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_restarts_roster_timer_and_keeps_summary_on_grid() {
    let latency = Duration::from_millis(1500);

    let roster = ScriptedSource::new(vec![], latency);
    let mut poller =
        WallboardPoller::with_source(&scripted_config(Layout::Roster, 1), roster.clone());
    poller.run_ticks(3).await;
    assert_eq!(roster.fetched_at(), vec![0.0, 2.5, 5.0, 7.5]);

    let summary = ScriptedSource::new(vec![], latency);
    let mut poller =
        WallboardPoller::with_source(&scripted_config(Layout::Summary, 1), summary.clone());
    poller.run_ticks(3).await;
    assert_eq!(summary.fetched_at(), vec![0.0, 2.5, 4.5, 6.5]);
}
