//! Page runtime: readiness, boot, layout signals and the global hook

use std::cell::RefCell;
use std::rc::Rc;

use sitemotion_core::anchor::scroll_motion;
use sitemotion_core::markers::Selectors;
use sitemotion_core::{Animator, Config, Error, NavController, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom::{WebDocument, WebElement};
use crate::events::EventListener;
use crate::observer::{PageWatcher, WebAnimator};
use crate::timers::TimeoutScheduler;
use crate::{logging, navigation, scroll, settings};

/// Name of the re-entrancy hook installed on `window`
pub const GLOBAL_HOOK: &str = "initAnimations";

/// Everything that must live as long as the page.
pub struct Runtime {
    animator: Rc<WebAnimator>,
    watcher: PageWatcher,
    nav: Rc<NavController<WebElement>>,
    _listeners: Vec<EventListener>,
}

impl Runtime {
    #[must_use]
    pub fn animator(&self) -> &WebAnimator {
        &self.animator
    }

    #[must_use]
    pub fn nav(&self) -> &NavController<WebElement> {
        &self.nav
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Load configuration, install logging, and boot once the DOM is ready.
///
/// # Errors
///
/// Returns an error outside a browser context or if the ready listener
/// cannot be attached.
pub fn start() -> Result<()> {
    let document = WebDocument::from_window()?;

    let loaded = settings::load(&document);
    let config = loaded.clone().ok().flatten().unwrap_or_default();
    logging::init(&config.log_level);
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "ignoring page configuration");
    }

    if !document.is_loading() {
        boot(document, &config);
        return Ok(());
    }

    let ready_document = document.clone();
    let on_ready = Closure::once(move || boot(ready_document, &config));
    document
        .raw()
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .map_err(|e| Error::listener_failed("DOMContentLoaded", format!("{e:?}")))?;
    on_ready.forget();
    Ok(())
}

/// Wire every feature into the page. Features that fail to bind are logged
/// and skipped; the rest keep working.
fn boot(document: WebDocument, config: &Config) {
    let selectors = Selectors::new(&config.markers);
    let animator = Rc::new(Animator::new(document.clone(), TimeoutScheduler, config));
    let watcher = PageWatcher::for_page(&document, &animator, &config.motion.observer);

    let outcome = animator.boot(&watcher);
    watcher.flush(&animator);

    let mut listeners = Vec::new();

    if config.motion.rescan_on_layout_signals && !animator.reduced_motion() {
        match watch_layout_signals(&document, &animator) {
            Ok(listener) => listeners.extend(listener),
            Err(e) => tracing::warn!(error = %e, "layout signals unavailable"),
        }
    }

    let nav = Rc::new(NavController::discover(&document, config));
    match navigation::bind(&document, &nav) {
        Ok(bound) => listeners.extend(bound),
        Err(e) => tracing::warn!(error = %e, "mobile navigation disabled"),
    }

    if config.scroll.enabled {
        let motion = scroll_motion(animator.reduced_motion(), &config.scroll);
        match scroll::bind(&document, &selectors.anchors, motion) {
            Ok(bound) => listeners.extend(bound),
            Err(e) => tracing::warn!(error = %e, "anchor scrolling disabled"),
        }
    }

    if let Err(e) = install_global_hook(&document) {
        tracing::warn!(error = %e, "re-entrancy hook unavailable");
    }

    tracing::info!(?outcome, listeners = listeners.len(), "sitemotion ready");
    RUNTIME.with(|slot| {
        *slot.borrow_mut() = Some(Runtime {
            animator,
            watcher,
            nav,
            _listeners: listeners,
        });
    });
}

/// Re-run the eager pass when fonts finish loading and on window `load`.
fn watch_layout_signals(
    document: &WebDocument,
    animator: &Rc<WebAnimator>,
) -> Result<Option<EventListener>> {
    match document.raw().fonts().ready() {
        Ok(ready) => {
            let animator = Rc::downgrade(animator);
            wasm_bindgen_futures::spawn_local(async move {
                if JsFuture::from(ready).await.is_ok() {
                    if let Some(animator) = animator.upgrade() {
                        let revealed = animator.on_layout_settled();
                        tracing::debug!(revealed, "fonts ready");
                    }
                }
            });
        }
        Err(e) => tracing::debug!(error = ?e, "font loading status unavailable"),
    }

    if document.is_complete() {
        return Ok(None);
    }

    let animator = Rc::downgrade(animator);
    EventListener::attach(document.window(), "load", move |_event| {
        if let Some(animator) = animator.upgrade() {
            let revealed = animator.on_layout_settled();
            tracing::debug!(revealed, "window loaded");
        }
    })
    .map(Some)
}

fn install_global_hook(document: &WebDocument) -> Result<()> {
    let hook = Closure::wrap(Box::new(reinit) as Box<dyn Fn()>);
    js_sys::Reflect::set(
        document.window(),
        &JsValue::from_str(GLOBAL_HOOK),
        hook.as_ref().unchecked_ref(),
    )
    .map_err(|e| Error::dom(format!("failed to install {GLOBAL_HOOK}: {e:?}")))?;
    hook.forget();
    Ok(())
}

/// Re-run initialization for content injected after boot.
pub fn reinit() {
    RUNTIME.with(|slot| {
        let runtime = slot.borrow();
        let Some(runtime) = runtime.as_ref() else {
            tracing::debug!("{GLOBAL_HOOK} called before boot");
            return;
        };
        let outcome = runtime.animator.init(&runtime.watcher);
        let fallback = runtime.watcher.flush(&runtime.animator);
        tracing::debug!(?outcome, fallback, "re-initialized");
    });
}

/// Run `f` against the booted runtime, if any.
pub fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> Option<R> {
    RUNTIME.with(|slot| slot.borrow().as_ref().map(f))
}
