use std::time::Duration;

use tokio::time::Instant;

use wallboard_core::config::WallboardConfig;
use wallboard_core::refresh::{CycleOutcome, FetchError, RefreshLoop, TickAction};
use wallboard_core::render::targets;
use wallboard_core::surface::MemorySurface;
use wallboard_core::thresholds::ALERT_CLASS;

use crate::fetch::{SnapshotClient, SnapshotSource};

const TICK: Duration = Duration::from_secs(1);

/// Runs the refresh loop against a snapshot source, rendering into an
/// in-memory surface and logging each cycle.
pub struct WallboardPoller<S = SnapshotClient> {
    source: S,
    refresh: RefreshLoop,
    surface: MemorySurface,
}

impl WallboardPoller {
    pub fn new(config: &WallboardConfig) -> Result<Self, FetchError> {
        Ok(Self::with_source(config, SnapshotClient::new(config)?))
    }
}

impl<S: SnapshotSource> WallboardPoller<S> {
    pub fn with_source(config: &WallboardConfig, source: S) -> Self {
        Self {
            source,
            refresh: RefreshLoop::new(config),
            surface: MemorySurface::with_targets(config.layout.targets()),
        }
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn refresh_loop(&self) -> &RefreshLoop {
        &self.refresh
    }

    /// Run the poller loop until the task is dropped.
    pub async fn run(mut self) {
        self.drive(None).await;
    }

    /// Initial fetch followed by `ticks` timer ticks.
    pub async fn run_ticks(&mut self, ticks: u64) {
        self.drive(Some(ticks)).await;
    }

    async fn drive(&mut self, limit: Option<u64>) {
        tracing::info!(
            endpoint = self.source.endpoint(),
            layout = %self.refresh.layout(),
            "Wallboard poller starting"
        );
        if self.refresh.start() == TickAction::Fetch {
            self.fetch_and_render().await;
        }

        // The fetch runs inline, so the timer cannot fire while it is pending.
        // Once it returns, Roster restarts the timer from now and Summary
        // resumes on its original one-second grid; neither fires the ticks
        // missed during the fetch.
        let origin = Instant::now();
        let mut ticker = tokio::time::interval_at(origin + TICK, TICK);
        let mut ticks = 0;
        while limit.is_none_or(|max| ticks < max) {
            ticker.tick().await;
            ticks += 1;
            if self.tick() == TickAction::Fetch {
                self.fetch_and_render().await;
                if self.refresh.layout().restarts_timer_on_fetch() {
                    ticker.reset();
                } else {
                    ticker.reset_at(next_on_grid(origin, Instant::now()));
                }
            }
        }
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickAction {
        self.refresh.tick(&mut self.surface)
    }

    /// Finish the fetch the loop has claimed.
    pub async fn fetch_and_render(&mut self) -> CycleOutcome {
        let result = self.source.fetch_snapshot().await;
        let outcome = self.refresh.complete(result, &mut self.surface);
        if let CycleOutcome::Rendered(report) = &outcome {
            let text = |id: &'static str| self.surface.text(id).unwrap_or_default();
            tracing::info!(
                calls_in_queue = text(targets::CALLS_IN_QUEUE),
                calls_handled = text(targets::CALLS_HANDLED),
                calls_abandoned = text(targets::CALLS_ABANDONED),
                longest_wait = text(targets::LONGEST_WAIT_TIME),
                answer_rate = text(targets::AGENT_ANSWER_RATE),
                avg_duration = text(targets::AVERAGE_CONTACT_DURATION),
                queue_alert = self
                    .surface
                    .has_class(targets::CALLS_IN_QUEUE_CONTAINER, ALERT_CLASS),
                skipped = report.missing.len(),
                "Wallboard refreshed"
            );
        }
        outcome
    }
}

/// First one-second boundary after `now`, counted from `origin`.
fn next_on_grid(origin: Instant, now: Instant) -> Instant {
    let elapsed = now.saturating_duration_since(origin).as_millis();
    let whole = elapsed / TICK.as_millis() + 1;
    origin + TICK * u32::try_from(whole).unwrap_or(u32::MAX)
}
