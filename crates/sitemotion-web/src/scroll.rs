//! Smooth scrolling for same-page anchors

use sitemotion_core::anchor::{self, ScrollMotion};
use sitemotion_core::host::{Document as _, Element as _};
use sitemotion_core::Result;
use web_sys::{Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom::{WebDocument, WebElement};
use crate::events::EventListener;

/// Scroll `target` to the top of the viewport.
pub fn scroll_to(target: &WebElement, motion: ScrollMotion) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(match motion {
        ScrollMotion::Smooth => ScrollBehavior::Smooth,
        ScrollMotion::Instant => ScrollBehavior::Instant,
    });
    options.set_block(ScrollLogicalPosition::Start);
    target
        .as_element()
        .scroll_into_view_with_scroll_into_view_options(&options);
}

/// Intercept clicks on anchors matching `selector` whose target exists.
///
/// The bare `#` and unknown ids keep the browser's default handling.
///
/// # Errors
///
/// Returns `ListenerFailed` if any listener cannot be attached.
pub fn bind(
    document: &WebDocument,
    selector: &str,
    motion: ScrollMotion,
) -> Result<Vec<EventListener>> {
    let listeners = document
        .query_all(selector)
        .into_iter()
        .map(|link| {
            let page = document.clone();
            let element = link.as_element().clone();
            EventListener::attach(&element, "click", move |event: Event| {
                let Some(href) = link.attribute("href") else {
                    return;
                };
                if let Some(target) = anchor::resolve(&page, &href) {
                    event.prevent_default();
                    scroll_to(&target, motion);
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(anchors = listeners.len(), "anchor scrolling bound");
    Ok(listeners)
}
