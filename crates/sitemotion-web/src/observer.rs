//! Viewport-intersection watcher
//!
//! Uses `IntersectionObserver` when the browser has it. Without it, elements
//! handed to the watcher are revealed right away so the page stays readable.

use std::cell::RefCell;
use std::rc::Rc;

use sitemotion_core::config::ObserverConfig;
use sitemotion_core::host::Watcher;
use sitemotion_core::{Animator, Error, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::{WebDocument, WebElement};
use crate::timers::TimeoutScheduler;

/// Animator bound to the browser.
pub type WebAnimator = Animator<WebDocument, TimeoutScheduler>;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// `IntersectionObserver` that reports first intersections to the animator
/// and then stops watching the element.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl VisibilityObserver {
    /// Create an observer feeding `animator`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the browser rejects the observer options.
    pub fn new(animator: &Rc<WebAnimator>, config: &ObserverConfig) -> Result<Self> {
        let animator = Rc::downgrade(animator);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let Some(animator) = animator.upgrade() else {
                    return;
                };
                for entry in entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter(|entry| entry.is_intersecting())
                {
                    let target = entry.target();
                    animator.on_intersect(&WebElement::new(target.clone()));
                    observer.unobserve(&target);
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&config.root_margin);
        options.set_threshold(&JsValue::from_f64(config.threshold));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(|e| Error::unavailable(format!("IntersectionObserver: {e:?}")))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Watcher<WebElement> for VisibilityObserver {
    fn observe(&self, element: &WebElement) {
        self.observer.observe(element.as_element());
    }
}

/// Fallback watcher that queues elements for immediate reveal.
#[derive(Default)]
pub struct ImmediateWatcher {
    queued: RefCell<Vec<WebElement>>,
}

impl ImmediateWatcher {
    fn drain(&self) -> Vec<WebElement> {
        self.queued.borrow_mut().drain(..).collect()
    }
}

impl Watcher<WebElement> for ImmediateWatcher {
    fn observe(&self, element: &WebElement) {
        self.queued.borrow_mut().push(element.clone());
    }
}

/// The watcher chosen for this page.
pub enum PageWatcher {
    Observer(VisibilityObserver),
    Immediate(ImmediateWatcher),
}

impl PageWatcher {
    /// Prefer `IntersectionObserver`, falling back to immediate reveal.
    pub fn for_page(
        document: &WebDocument,
        animator: &Rc<WebAnimator>,
        config: &ObserverConfig,
    ) -> Self {
        if !document.has_intersection_observer() {
            tracing::warn!("IntersectionObserver unavailable; revealing content immediately");
            return Self::Immediate(ImmediateWatcher::default());
        }

        match VisibilityObserver::new(animator, config) {
            Ok(observer) => Self::Observer(observer),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to immediate reveal");
                Self::Immediate(ImmediateWatcher::default())
            }
        }
    }

    /// Reveal anything the fallback watcher queued. Returns how many were revealed.
    pub fn flush(&self, animator: &WebAnimator) -> usize {
        match self {
            Self::Observer(_) => 0,
            Self::Immediate(watcher) => watcher
                .drain()
                .iter()
                .filter(|element| animator.on_intersect(element))
                .count(),
        }
    }
}

impl Watcher<WebElement> for PageWatcher {
    fn observe(&self, element: &WebElement) {
        match self {
            Self::Observer(observer) => observer.observe(element),
            Self::Immediate(watcher) => watcher.observe(element),
        }
    }
}
