//! Browser events for the mobile navigation controller

use std::rc::Rc;

use sitemotion_core::host::Document as _;
use sitemotion_core::{NavController, Result};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, Node};

use crate::dom::{WebDocument, WebElement};
use crate::events::EventListener;

/// Element a click landed on; text nodes resolve to their parent element.
fn click_target(event: &Event) -> Option<WebElement> {
    let node = event.target()?.dyn_into::<Node>().ok()?;
    match node.dyn_into::<Element>() {
        Ok(element) => Some(WebElement::new(element)),
        Err(node) => node.parent_element().map(WebElement::new),
    }
}

/// Attach toggle, outside-click, link-click and resize listeners.
///
/// # Errors
///
/// Returns `ListenerFailed` if any listener cannot be attached.
pub fn bind(
    document: &WebDocument,
    controller: &Rc<NavController<WebElement>>,
) -> Result<Vec<EventListener>> {
    let mut listeners = Vec::new();

    for (index, pair) in controller.pairs().iter().enumerate() {
        let controller = Rc::clone(controller);
        listeners.push(EventListener::attach(
            pair.toggle.as_element(),
            "click",
            move |event: Event| {
                // Keep the document handler from closing what this opens.
                event.stop_propagation();
                controller.toggle(index);
            },
        )?);
    }

    {
        let controller = Rc::clone(controller);
        listeners.push(EventListener::attach(
            document.raw(),
            "click",
            move |event: Event| {
                controller.on_document_click(click_target(&event).as_ref());
            },
        )?);
    }

    for link in controller.link_targets(document) {
        let controller = Rc::clone(controller);
        listeners.push(EventListener::attach(
            link.as_element(),
            "click",
            move |_event: Event| controller.close_all(),
        )?);
    }

    {
        let controller = Rc::clone(controller);
        let viewport = document.clone();
        listeners.push(EventListener::attach(
            document.window(),
            "resize",
            move |_event: Event| controller.on_resize(viewport.viewport_width()),
        )?);
    }

    tracing::debug!(
        pairs = controller.pairs().len(),
        listeners = listeners.len(),
        "mobile navigation bound"
    );
    Ok(listeners)
}
