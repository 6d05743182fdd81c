//! `web-sys` implementations of the core host traits
//!
//! Lookups that fail (bad selector, detached node, non-HTML element) degrade
//! to "nothing found" so a page without a feature simply skips it.

use sitemotion_core::geometry::Rect;
use sitemotion_core::host;
use sitemotion_core::{Error, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

/// Media query for the platform reduced-motion preference
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Handle to a live DOM element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement(Element);

impl WebElement {
    #[must_use]
    pub const fn new(element: Element) -> Self {
        Self(element)
    }

    #[must_use]
    pub const fn as_element(&self) -> &Element {
        &self.0
    }
}

impl From<Element> for WebElement {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

fn collect(list: std::result::Result<NodeList, JsValue>, selector: &str) -> Vec<WebElement> {
    match list {
        Ok(list) => (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect(),
        Err(e) => {
            tracing::debug!(selector, error = ?e, "selector rejected");
            Vec::new()
        }
    }
}

impl host::Element for WebElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            tracing::debug!(class, error = ?e, "failed to add class");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            tracing::debug!(class, error = ?e, "failed to remove class");
        }
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect::new(rect.top(), rect.bottom())
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        collect(self.0.query_selector_all(selector), selector)
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        self.0.closest(selector).ok().flatten().map(WebElement)
    }

    fn contains(&self, other: &Self) -> bool {
        self.0.contains(Some(other.0.as_ref()))
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn style_property(&self, name: &str) -> String {
        self.0
            .dyn_ref::<HtmlElement>()
            .and_then(|element| element.style().get_property_value(name).ok())
            .unwrap_or_default()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = element.style().set_property(name, value) {
            tracing::debug!(name, value, error = ?e, "failed to set style");
        }
    }
}

/// The browser window and its document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// Bind to the global window.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` outside a browser context.
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::unavailable("window"))?;
        let document = window
            .document()
            .ok_or_else(|| Error::unavailable("document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub const fn raw(&self) -> &Document {
        &self.document
    }

    /// Whether the document is still parsing.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    /// Whether every subresource has finished loading.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.document.ready_state() == "complete"
    }

    #[must_use]
    pub fn has_intersection_observer(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false)
    }

    fn client_extent(&self, extent: impl Fn(&Element) -> i32) -> f64 {
        self.document
            .document_element()
            .map_or(0.0, |root| f64::from(extent(&root)))
    }
}

fn positive(value: std::result::Result<JsValue, JsValue>) -> Option<f64> {
    value.ok().and_then(|v| v.as_f64()).filter(|v| *v > 0.0)
}

impl host::Document for WebDocument {
    type Element = WebElement;

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        collect(self.document.query_selector_all(selector), selector)
    }

    fn query_one(&self, selector: &str) -> Option<WebElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(WebElement)
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn body(&self) -> Option<WebElement> {
        self.document
            .body()
            .map(|body| WebElement(Element::from(body)))
    }

    fn viewport_height(&self) -> f64 {
        positive(self.window.inner_height())
            .unwrap_or_else(|| self.client_extent(Element::client_height))
    }

    fn viewport_width(&self) -> f64 {
        positive(self.window.inner_width())
            .unwrap_or_else(|| self.client_extent(Element::client_width))
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }
}
