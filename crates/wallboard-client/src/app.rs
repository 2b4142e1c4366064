use std::cell::RefCell;
use std::rc::Rc;

use wallboard_core::config::WallboardConfig;
use wallboard_core::refresh::{CycleOutcome, RefreshLoop, TickAction};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::diag;
use crate::dom::DocumentSurface;
use crate::fetch::fetch_snapshot;
use crate::page::{self, LogLevel};
use crate::storage;

/// Page state shared between the timer callback and pending fetches.
/// Uses Rc<RefCell> because WASM is single-threaded.
struct WallboardApp {
    config: WallboardConfig,
    refresh: RefreshLoop,
    surface: DocumentSurface,
    window: web_sys::Window,
    tick_fn: Option<js_sys::Function>,
    interval: Option<i32>,
}

type Shared = Rc<RefCell<WallboardApp>>;

/// Read page settings, fire the initial fetch, and start the countdown.
pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let layout_attr = document
        .body()
        .and_then(|body| body.get_attribute(page::LAYOUT_ATTRIBUTE));
    let config = page::page_config(layout_attr.as_deref(), storage::load_endpoint());
    diag::console_log!("Wallboard starting ({} layout, {})", config.layout, config.endpoint);

    let app: Shared = Rc::new(RefCell::new(WallboardApp {
        refresh: RefreshLoop::new(&config),
        config,
        surface: DocumentSurface::new(document),
        window,
        tick_fn: None,
        interval: None,
    }));

    let tick_app = Rc::clone(&app);
    let closure = Closure::<dyn FnMut()>::new(move || on_tick(&tick_app));
    app.borrow_mut().tick_fn = Some(closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
    closure.forget();

    let action = app.borrow_mut().refresh.start();
    if action == TickAction::Fetch {
        begin_fetch(&app);
    }
    start_countdown(&app);
    Ok(())
}

fn on_tick(app: &Shared) {
    let action = {
        let mut guard = app.borrow_mut();
        let state = &mut *guard;
        state.refresh.tick(&mut state.surface)
    };
    if action == TickAction::Fetch {
        begin_fetch(app);
    }
}

/// (Re)start the one-second countdown timer, replacing any running one.
fn start_countdown(app: &Shared) {
    let mut state = app.borrow_mut();
    if let Some(handle) = state.interval.take() {
        state.window.clear_interval_with_handle(handle);
    }
    let Some(tick_fn) = state.tick_fn.clone() else {
        return;
    };
    let started = state
        .window
        .set_interval_with_callback_and_timeout_and_arguments_0(&tick_fn, page::TICK_MS);
    match started {
        Ok(handle) => state.interval = Some(handle),
        Err(e) => diag::console_error!("Failed to start countdown: {e:?}"),
    }
}

fn begin_fetch(app: &Shared) {
    let (endpoint, timeout_ms, restart) = {
        let state = app.borrow();
        (
            state.config.endpoint.clone(),
            state.config.request_timeout_ms,
            state.refresh.layout().restarts_timer_on_fetch(),
        )
    };
    diag::console_log!("Fetching data...");

    let pending = Rc::clone(app);
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_snapshot(&endpoint, timeout_ms).await;
        let outcome = {
            let mut guard = pending.borrow_mut();
            let state = &mut *guard;
            state.refresh.complete(result, &mut state.surface)
        };
        report(&outcome);
    });

    if restart {
        start_countdown(app);
    }
}

fn report(outcome: &CycleOutcome) {
    for (level, line) in page::outcome_lines(outcome) {
        match level {
            LogLevel::Log => diag::console_log!("{line}"),
            LogLevel::Warn => diag::console_warn!("{line}"),
            LogLevel::Error => diag::console_error!("{line}"),
        }
    }
}
