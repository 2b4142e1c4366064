//! Browser client for the wallboard page.
//!
//! The page selects its layout with `<body data-wallboard="roster|summary">`;
//! everything else comes from compiled-in defaults and, for the roster
//! layout, an endpoint saved in localStorage.

#[cfg(target_family = "wasm")]
mod app;
mod diag;
#[cfg(target_family = "wasm")]
mod dom;
#[cfg(target_family = "wasm")]
mod fetch;
pub mod page;
pub mod storage;

use wasm_bindgen::prelude::*;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        if let Err(e) = app::run() {
            diag::console_error!("Wallboard failed to start: {e:?}");
        }
    }
}
