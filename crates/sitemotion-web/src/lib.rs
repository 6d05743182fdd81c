//! Browser bindings for sitemotion
//!
//! Compiled to `wasm32-unknown-unknown` and loaded by a static site. On start
//! it reads the optional page configuration, installs console logging, and
//! once the DOM is ready:
//! - reveals sections near the viewport and watches the rest
//! - re-scans on fixed delays, window `load`, and web-font readiness
//! - wires the mobile menu toggle(s) and same-page anchor scrolling
//! - installs `window.initAnimations` for content injected later
//!
//! ## Module Structure
//! - `dom`: host trait implementations over `web-sys`
//! - `timers`: `setTimeout` scheduler
//! - `observer`: `IntersectionObserver` watcher and its fallback
//! - `events`: owned event listeners
//! - `navigation`: mobile menu listeners
//! - `scroll`: anchor click interception
//! - `settings`: page-embedded JSON configuration
//! - `logging`: `tracing` to browser console
//! - `runtime`: readiness, boot, and the global hook

#![forbid(unsafe_code)]

pub mod dom;
pub mod events;
pub mod logging;
pub mod navigation;
pub mod observer;
pub mod runtime;
pub mod scroll;
pub mod settings;
pub mod timers;

use wasm_bindgen::prelude::*;

pub use dom::{WebDocument, WebElement};
pub use observer::{PageWatcher, WebAnimator};
pub use timers::TimeoutScheduler;

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();

    if let Err(e) = runtime::start() {
        web_sys::console::warn_1(&JsValue::from_str(&format!("[sitemotion] {e}")));
    }
}

/// Re-run initialization after injecting content. Also available as
/// `window.initAnimations`.
#[wasm_bindgen(js_name = initAnimations)]
pub fn init_animations() {
    runtime::reinit();
}
