//! Mobile navigation controller
//!
//! Each menu toggle is paired with one nav element. Open/closed state lives in
//! a single [`NavState`]; every event goes through [`NavController::dispatch`],
//! which then rewrites all markers at once:
//! - `active` on each toggle and nav whose pair is open
//! - `menu-open` on the body while any pair is open

use std::cell::RefCell;

use crate::config::Config;
use crate::host::{Document, Element};
use crate::markers::{Markers, Selectors};

/// Input to the navigation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// A toggle control was clicked
    Toggle(usize),
    /// Outside click or navigation link click
    CloseAll,
    /// Viewport resized to `width` CSS pixels
    Resize { width: f64 },
}

/// Open flag per toggle/nav pair. Every page view starts closed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    open: Vec<bool>,
}

impl NavState {
    #[must_use]
    pub fn closed(pairs: usize) -> Self {
        Self {
            open: vec![false; pairs],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn any_open(&self) -> bool {
        self.open.iter().any(|open| *open)
    }

    /// Apply an event. Returns whether any pair changed.
    ///
    /// ```
    /// use sitemotion_core::nav::{NavEvent, NavState};
    ///
    /// let mut state = NavState::closed(1);
    /// assert!(state.apply(NavEvent::Toggle(0), 992.0));
    /// assert!(state.is_open(0));
    /// assert!(!state.apply(NavEvent::Resize { width: 800.0 }, 992.0));
    /// assert!(state.apply(NavEvent::Resize { width: 1200.0 }, 992.0));
    /// assert!(!state.any_open());
    /// ```
    pub fn apply(&mut self, event: NavEvent, breakpoint_px: f64) -> bool {
        match event {
            NavEvent::Toggle(index) => self.open.get_mut(index).is_some_and(|open| {
                *open = !*open;
                true
            }),
            NavEvent::CloseAll => self.close_all(),
            NavEvent::Resize { width } if width > breakpoint_px => self.close_all(),
            NavEvent::Resize { .. } => false,
        }
    }

    fn close_all(&mut self) -> bool {
        let changed = self.any_open();
        self.open.iter_mut().for_each(|open| *open = false);
        changed
    }
}

/// A menu toggle control and the nav it opens.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPair<E> {
    pub toggle: E,
    pub nav: E,
}

/// Owns the navigation state and keeps page markers in sync with it.
pub struct NavController<E: Element> {
    pairs: Vec<NavPair<E>>,
    body: Option<E>,
    state: RefCell<NavState>,
    markers: Markers,
    selectors: Selectors,
    breakpoint_px: f64,
}

impl<E: Element> NavController<E> {
    /// Find toggle/nav pairs in `document`.
    ///
    /// A toggle names its nav through the configured pairing attribute
    /// (`aria-controls` by default). Toggles without a resolvable declaration
    /// fall back to the nav at the same position.
    pub fn discover<D: Document<Element = E>>(document: &D, config: &Config) -> Self {
        let selectors = Selectors::new(&config.markers);
        let navs = document.query_all(&selectors.navs);

        let pairs = document
            .query_all(&selectors.menu_toggles)
            .into_iter()
            .enumerate()
            .filter_map(|(index, toggle)| {
                let nav = declared_nav(document, &toggle, &config.nav.pairing_attribute)
                    .or_else(|| {
                        tracing::warn!(index, "menu toggle declares no nav; pairing by position");
                        navs.get(index).cloned()
                    });
                if nav.is_none() {
                    tracing::debug!(index, "menu toggle has no nav to control");
                }
                nav.map(|nav| NavPair { toggle, nav })
            })
            .collect();

        Self::new(pairs, document.body(), config)
    }

    pub fn new(pairs: Vec<NavPair<E>>, body: Option<E>, config: &Config) -> Self {
        let state = RefCell::new(NavState::closed(pairs.len()));
        Self {
            pairs,
            body,
            state,
            markers: config.markers.clone(),
            selectors: Selectors::new(&config.markers),
            breakpoint_px: config.nav.breakpoint_px,
        }
    }

    pub fn pairs(&self) -> &[NavPair<E>] {
        &self.pairs
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.state.borrow().is_open(index)
    }

    /// Apply `event` and resynchronize every marker.
    pub fn dispatch(&self, event: NavEvent) {
        let changed = self.state.borrow_mut().apply(event, self.breakpoint_px);
        self.sync();
        tracing::debug!(?event, changed, "navigation event");
    }

    pub fn toggle(&self, index: usize) {
        self.dispatch(NavEvent::Toggle(index));
    }

    pub fn close_all(&self) {
        self.dispatch(NavEvent::CloseAll);
    }

    pub fn on_resize(&self, width: f64) {
        self.dispatch(NavEvent::Resize { width });
    }

    /// Document-level click. Clicks inside a nav or on a toggle are ignored.
    pub fn on_document_click(&self, target: Option<&E>) {
        if target.is_some_and(|target| self.is_inside_menu(target)) {
            return;
        }
        self.close_all();
    }

    /// Whether `target` sits inside any paired nav or toggle, or inside any
    /// `nav` or toggle on the page.
    #[must_use]
    pub fn is_inside_menu(&self, target: &E) -> bool {
        self.pairs
            .iter()
            .any(|pair| pair.nav.contains(target) || pair.toggle.contains(target))
            || target.closest(&self.selectors.navs).is_some()
            || target.closest(&self.selectors.menu_toggles).is_some()
    }

    /// Links that close the menu when followed: every link in a paired nav,
    /// plus `nav` links and call-to-action links elsewhere on the page.
    pub fn link_targets<D: Document<Element = E>>(&self, document: &D) -> Vec<E> {
        let mut links = Vec::new();
        let found = self
            .pairs
            .iter()
            .flat_map(|pair| pair.nav.query_all(&self.selectors.menu_links))
            .chain(document.query_all(&self.selectors.nav_links))
            .chain(document.query_all(&self.selectors.nav_cta_links));
        for link in found {
            if !links.contains(&link) {
                links.push(link);
            }
        }
        links
    }

    fn sync(&self) {
        let state = self.state.borrow();

        for (index, pair) in self.pairs.iter().enumerate() {
            set_marker(&pair.toggle, &self.markers.active, state.is_open(index));
            let nav_open = self
                .pairs
                .iter()
                .enumerate()
                .any(|(other, candidate)| candidate.nav == pair.nav && state.is_open(other));
            set_marker(&pair.nav, &self.markers.active, nav_open);
        }

        if let Some(body) = &self.body {
            set_marker(body, &self.markers.menu_open, state.any_open());
        }
    }
}

fn declared_nav<D: Document>(
    document: &D,
    toggle: &D::Element,
    attribute: &str,
) -> Option<D::Element> {
    toggle
        .attribute(attribute)?
        .split_whitespace()
        .find_map(|id| document.element_by_id(id))
}

fn set_marker<E: Element>(element: &E, class: &str, on: bool) {
    if on {
        element.add_class(class);
    } else {
        element.remove_class(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_only_its_pair() {
        let mut state = NavState::closed(2);
        assert!(state.apply(NavEvent::Toggle(1), 992.0));
        assert!(!state.is_open(0));
        assert!(state.is_open(1));
        assert!(state.any_open());

        assert!(state.apply(NavEvent::Toggle(1), 992.0));
        assert!(!state.any_open());
    }

    #[test]
    fn test_toggle_out_of_range_is_ignored() {
        let mut state = NavState::closed(1);
        assert!(!state.apply(NavEvent::Toggle(3), 992.0));
        assert_eq!(state, NavState::closed(1));
    }

    #[test]
    fn test_close_all_reports_change_only_when_open() {
        let mut state = NavState::closed(2);
        assert!(!state.apply(NavEvent::CloseAll, 992.0));
        state.apply(NavEvent::Toggle(0), 992.0);
        state.apply(NavEvent::Toggle(1), 992.0);
        assert!(state.apply(NavEvent::CloseAll, 992.0));
        assert!(!state.any_open());
    }

    #[test]
    fn test_resize_closes_only_above_breakpoint() {
        let mut state = NavState::closed(1);
        state.apply(NavEvent::Toggle(0), 992.0);
        assert!(!state.apply(NavEvent::Resize { width: 992.0 }, 992.0));
        assert!(state.is_open(0));
        assert!(state.apply(NavEvent::Resize { width: 993.0 }, 992.0));
        assert!(!state.is_open(0));
    }

    #[test]
    fn test_empty_state() {
        let state = NavState::closed(0);
        assert!(state.is_empty());
        assert!(!state.any_open());
        assert!(!state.is_open(0));
    }
}
