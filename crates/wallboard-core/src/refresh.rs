//! The poll / render / countdown cycle, independent of how the snapshot is
//! fetched or where it is drawn.
//!
//! A host owns one [`RefreshLoop`], calls [`RefreshLoop::tick`] once per
//! second, starts a fetch whenever it returns [`TickAction::Fetch`], and hands
//! the result back to [`RefreshLoop::complete`].

use crate::config::WallboardConfig;
use crate::countdown::Countdown;
use crate::render::{Layout, Renderer, targets};
use crate::snapshot::WallboardSnapshot;
use crate::surface::{ApplyReport, DomOp, LookupMode, RenderError, Surface, apply_ops};

/// Why a snapshot could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    Http(u16),
    Network(String),
    Timeout,
    Decode(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(status) => write!(f, "HTTP error! status: {status}"),
            Self::Network(m) => write!(f, "network error: {m}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Decode(m) => write!(f, "invalid snapshot: {m}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    Wait,
    Fetch,
}

/// How a fetch cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Snapshot applied; the report lists any ids skipped defensively.
    Rendered(ApplyReport),
    /// Nothing on the surface was touched.
    FetchFailed(FetchError),
    /// Strict lookup hit a missing element part-way through.
    RenderAborted(RenderError),
}

pub struct RefreshLoop {
    renderer: Renderer,
    countdown: Countdown,
    in_flight: bool,
}

impl RefreshLoop {
    pub fn new(config: &WallboardConfig) -> Self {
        Self {
            renderer: Renderer::new(config.layout, config.thresholds.clone())
                .with_queue_override(config.debug_queue_override),
            countdown: Countdown::new(config.update_interval_secs),
            in_flight: false,
        }
    }

    pub fn layout(&self) -> Layout {
        self.renderer.layout()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Claim the fetch slot for the initial load.
    pub fn start(&mut self) -> TickAction {
        self.claim_fetch()
    }

    /// One timer tick: update the countdown label and report whether a fetch
    /// should start now. A tick that falls due while a fetch is pending only
    /// updates the label.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> TickAction {
        if self.advance_countdown(surface) {
            self.claim_fetch()
        } else {
            TickAction::Wait
        }
    }

    /// Finish the pending fetch. Failures are reported, never propagated; on
    /// failure the counter is left as it was so the next tick retries.
    pub fn complete<S: Surface + ?Sized>(
        &mut self,
        result: Result<WallboardSnapshot, FetchError>,
        surface: &mut S,
    ) -> CycleOutcome {
        self.in_flight = false;
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching data");
                return CycleOutcome::FetchFailed(e);
            },
        };

        let ops = self.renderer.render(&snapshot);
        match apply_ops(&mut *surface, &ops, self.layout().lookup_mode()) {
            Ok(report) => {
                for id in &report.missing {
                    tracing::warn!("Element with ID '{id}' not found");
                }
                self.countdown.reset();
                self.advance_countdown(surface);
                CycleOutcome::Rendered(report)
            },
            Err(e) => {
                tracing::error!(error = %e, "Render aborted");
                CycleOutcome::RenderAborted(e)
            },
        }
    }

    /// Count down one second and show the label. Returns whether a fetch is
    /// due; never claims one.
    fn advance_countdown<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let tick = self.countdown.tick();
        if let Err(e) = self.write_countdown(surface, tick.label) {
            tracing::error!(error = %e, "Countdown update failed");
        }
        tick.due
    }

    fn write_countdown<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        label: String,
    ) -> Result<(), RenderError> {
        let op = DomOp::SetText {
            target: targets::COUNTDOWN,
            text: label,
        };
        if surface.apply(&op) {
            return Ok(());
        }
        match self.layout().lookup_mode() {
            LookupMode::Defensive => {
                tracing::warn!("Element with ID '{}' not found", targets::COUNTDOWN);
                Ok(())
            },
            LookupMode::Strict => Err(RenderError::MissingTarget(targets::COUNTDOWN)),
        }
    }

    fn claim_fetch(&mut self) -> TickAction {
        if self.in_flight {
            return TickAction::Wait;
        }
        self.in_flight = true;
        TickAction::Fetch
    }
}
