//! Seams between the decision logic and the page it runs on.
//!
//! The browser crate implements these over `web-sys`; tests implement them
//! over an in-memory page and a manual clock.

use crate::geometry::Rect;

/// A live element of the host page.
///
/// Clones are handles to the same element; equality is identity.
pub trait Element: Clone + PartialEq + 'static {
    fn has_class(&self, class: &str) -> bool;

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    /// Bounding box relative to the viewport.
    fn bounding_rect(&self) -> Rect;

    /// Descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, selector: &str) -> Option<Self>;

    /// Whether `other` is this element or one of its descendants.
    fn contains(&self, other: &Self) -> bool;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Inline style value, empty when unset.
    fn style_property(&self, name: &str) -> String;

    fn set_style_property(&self, name: &str, value: &str);
}

/// The host document together with the window facts the runtime reads.
pub trait Document {
    type Element: Element;

    /// Elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn query_one(&self, selector: &str) -> Option<Self::Element> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn body(&self) -> Option<Self::Element>;

    /// Visible viewport height in CSS pixels.
    fn viewport_height(&self) -> f64;

    /// Visible viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Platform reduced-motion preference.
    fn prefers_reduced_motion(&self) -> bool;
}

/// Deferred task execution on the host's timer queue.
pub trait Scheduler {
    /// Run `task` once after `delay_ms`. Tasks must not run synchronously.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Viewport-intersection watcher.
///
/// Implementations report the first intersection of an observed element to
/// [`crate::animator::Animator::on_intersect`] and then stop watching it.
pub trait Watcher<E: Element> {
    fn observe(&self, element: &E);
}
