//! Visibility animator
//!
//! Decides when each animatable element goes from hidden to visible and
//! schedules the staggered reveal of its children.
//!
//! # Lifecycle
//! 1. [`Animator::boot`] runs an eager pass over sections near the viewport,
//!    registers scroll targets with a [`Watcher`], and schedules re-scans.
//! 2. The watcher reports first intersections to [`Animator::on_intersect`].
//! 3. Re-scans at fixed delays (and on layout signals) catch elements whose
//!    geometry settled late.
//!
//! Visibility is one-way: the visible marker is never removed, and an element
//! with a pending reveal is never scheduled twice. When the platform reports a
//! reduced-motion preference every entry point short-circuits to a static page.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cancel::CancelToken;
use crate::config::{Config, MotionConfig, PassConfig};
use crate::geometry::ViewportWindow;
use crate::host::{Document, Element, Scheduler, Watcher};
use crate::markers::{Markers, Selectors};
use crate::stagger::{StaggerPlan, css_millis};

/// Result of an initialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Reduced motion is active; `restored` elements were forced visible.
    ReducedMotion { restored: usize },
    /// Elements revealed immediately and elements handed to the watcher.
    Animated { revealed: usize, watched: usize },
}

struct PendingReveal<E> {
    element: E,
    token: CancelToken,
}

/// Scroll-triggered reveal controller for one document.
pub struct Animator<D: Document, S: Scheduler> {
    document: D,
    scheduler: S,
    motion: MotionConfig,
    markers: Markers,
    selectors: Selectors,
    reduced_motion: bool,
    pending: RefCell<Vec<PendingReveal<D::Element>>>,
}

impl<D, S> Animator<D, S>
where
    D: Document + 'static,
    S: Scheduler + 'static,
{
    /// Create an animator. The reduced-motion preference is read here, once.
    pub fn new(document: D, scheduler: S, config: &Config) -> Self {
        let reduced_motion = document.prefers_reduced_motion();
        Self {
            document,
            scheduler,
            motion: config.motion.clone(),
            markers: config.markers.clone(),
            selectors: Selectors::new(&config.markers),
            reduced_motion,
            pending: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Full page start: eager pass, registration, then the re-scan schedule.
    pub fn boot<W: Watcher<D::Element>>(self: &Rc<Self>, watcher: &W) -> InitOutcome {
        if self.reduced_motion {
            return self.restore_static();
        }

        let early = self.scan_sections();
        let outcome = match self.register(watcher) {
            InitOutcome::Animated { revealed, watched } => InitOutcome::Animated {
                revealed: revealed.saturating_add(early),
                watched,
            },
            other => other,
        };
        self.schedule_rescans();

        tracing::info!(?outcome, "visibility animator started");
        outcome
    }

    /// Re-entrant initialization for content injected after boot.
    pub fn init<W: Watcher<D::Element>>(&self, watcher: &W) -> InitOutcome {
        if self.reduced_motion {
            return self.restore_static();
        }
        self.register(watcher)
    }

    /// Eager pass over sections near the viewport. Returns how many were revealed.
    pub fn scan_sections(&self) -> usize {
        if self.reduced_motion {
            return 0;
        }
        self.cancel_detached();

        let sections = self
            .document
            .query_all(&self.selectors.eager_sections)
            .iter()
            .filter(|section| {
                self.reveal_if_near(
                    section,
                    self.motion.section_pass,
                    Some(self.selectors.stagger_children.as_str()),
                )
            })
            .count();

        let nested = self
            .document
            .query_all(&self.selectors.content_sections)
            .iter()
            .filter(|section| {
                self.reveal_if_near(
                    section,
                    self.motion.nested_pass,
                    Some(self.selectors.cards.as_str()),
                )
            })
            .count();

        tracing::debug!(sections, nested, "eager visibility pass");
        sections.saturating_add(nested)
    }

    /// Lenient pass over content sections once layout has settled.
    pub fn settle_scan(&self) -> usize {
        if self.reduced_motion {
            return 0;
        }
        self.cancel_detached();

        let revealed = self
            .document
            .query_all(&self.selectors.content_sections)
            .iter()
            .filter(|section| {
                self.reveal_if_near(
                    section,
                    self.motion.settle_pass,
                    Some(self.selectors.cards.as_str()),
                )
            })
            .count();

        tracing::debug!(revealed, "settle pass");
        revealed
    }

    /// Host reported that layout settled (window load, fonts ready).
    pub fn on_layout_settled(&self) -> usize {
        self.scan_sections()
    }

    /// First intersection of a watched element. The caller stops watching it.
    ///
    /// Returns `false` when the element was already visible, in which case
    /// nothing is scheduled.
    pub fn on_intersect(&self, element: &D::Element) -> bool {
        if self.reduced_motion || element.has_class(&self.markers.visible) {
            return false;
        }
        let grid = self
            .is_grid_host(element)
            .then_some((self.selectors.stagger_children.as_str(), self.motion.grid_base_ms));
        self.reveal(element, grid);

        for nested in element.query_all(&self.selectors.content_sections) {
            if !nested.has_class(&self.markers.visible) {
                self.reveal(
                    &nested,
                    Some((self.selectors.cards.as_str(), self.motion.nested_card_base_ms)),
                );
            }
        }

        tracing::debug!("revealed on intersection");
        true
    }

    /// Cancel pending reveals whose element has left the document.
    pub fn cancel_detached(&self) -> usize {
        let mut pending = self.pending.borrow_mut();
        let cancelled = pending
            .iter()
            .filter(|reveal| !reveal.element.is_connected())
            .filter(|reveal| reveal.token.cancel())
            .count();
        pending.retain(|reveal| reveal.token.is_pending());

        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled reveals of detached elements");
        }
        cancelled
    }

    /// Number of scheduled reveals that have not fired yet.
    #[must_use]
    pub fn pending_reveals(&self) -> usize {
        self.pending
            .borrow()
            .iter()
            .filter(|reveal| reveal.token.is_pending())
            .count()
    }

    /// Reveal entries held for cancellation, including fired ones not yet
    /// pruned.
    #[must_use]
    pub fn tracked_reveals(&self) -> usize {
        self.pending.borrow().len()
    }

    fn register<W: Watcher<D::Element>>(&self, watcher: &W) -> InitOutcome {
        self.mark_load_targets();
        let (revealed, watched) = self.register_scroll_targets(watcher);
        self.stagger_footer_columns();
        InitOutcome::Animated { revealed, watched }
    }

    fn restore_static(&self) -> InitOutcome {
        let targets = self
            .document
            .query_all(&self.selectors.reduced_motion_targets);
        for element in &targets {
            element.remove_class(&self.markers.animate_on_scroll);
            element.remove_class(&self.markers.animate_on_load);
            element.remove_class(&self.markers.animate_child);
            element.set_style_property("opacity", "1");
            element.set_style_property("transform", "none");
        }

        tracing::info!(
            restored = targets.len(),
            "reduced motion requested; animations disabled"
        );
        InitOutcome::ReducedMotion {
            restored: targets.len(),
        }
    }

    fn mark_load_targets(&self) {
        for selector in [
            &self.selectors.load_header,
            &self.selectors.hero_content,
            &self.selectors.page_header,
        ] {
            if let Some(element) = self.document.query_one(selector) {
                element.add_class(&self.markers.animate_on_load);
            }
        }

        let plan = StaggerPlan::new(0, self.motion.load_step_ms);
        for (index, element) in self
            .document
            .query_all(&self.selectors.animate_on_load)
            .iter()
            .enumerate()
        {
            if element.style_property("animation-delay").is_empty() {
                element.set_style_property("animation-delay", &css_millis(plan.delay_for(index)));
            }
        }
    }

    fn register_scroll_targets<W: Watcher<D::Element>>(&self, watcher: &W) -> (usize, usize) {
        let mut revealed = 0_usize;
        let mut watched = 0_usize;

        for element in self
            .scroll_candidates()
            .iter()
            .filter(|element| !element.has_class(&self.markers.visible))
        {
            let children = self
                .is_stagger_section(element)
                .then_some(self.selectors.stagger_children.as_str());
            if self.reveal_if_near(element, self.motion.section_pass, children) {
                revealed = revealed.saturating_add(1);
            } else {
                watcher.observe(element);
                watched = watched.saturating_add(1);
            }
        }

        tracing::debug!(revealed, watched, "scroll targets registered");
        (revealed, watched)
    }

    /// Scroll targets in document order, without duplicates.
    fn scroll_candidates(&self) -> Vec<D::Element> {
        let mut candidates = Vec::new();

        for element in self.document.query_all(&self.selectors.animate_on_scroll) {
            push_unique(&mut candidates, element);
        }

        for element in self.document.query_all(&self.selectors.scroll_sections) {
            if element.has_class(&self.markers.hero) || element.has_class(&self.markers.page_header)
            {
                continue;
            }
            element.add_class(&self.markers.animate_on_scroll);
            push_unique(&mut candidates, element);
        }

        for element in self.document.query_all(&self.selectors.content_sections) {
            element.add_class(&self.markers.animate_on_scroll);
            push_unique(&mut candidates, element);
        }

        candidates
    }

    fn stagger_footer_columns(&self) {
        let Some(container) = self.document.query_one(&self.selectors.footer_container) else {
            return;
        };

        let plan = StaggerPlan::new(0, self.motion.load_step_ms);
        for (index, column) in container
            .query_all(&self.selectors.footer_cols)
            .iter()
            .enumerate()
        {
            column.set_style_property("transition-delay", &css_millis(plan.delay_for(index)));
        }
    }

    fn schedule_rescans(self: &Rc<Self>) {
        for &delay in &self.motion.rescan_delays_ms {
            let this = Rc::downgrade(self);
            self.scheduler.schedule(
                delay,
                Box::new(move || {
                    if let Some(animator) = this.upgrade() {
                        animator.scan_sections();
                    }
                }),
            );
        }

        let this = Rc::downgrade(self);
        self.scheduler.schedule(
            self.motion.settle_delay_ms,
            Box::new(move || {
                if let Some(animator) = this.upgrade() {
                    animator.settle_scan();
                }
            }),
        );
    }

    fn reveal_if_near(
        &self,
        element: &D::Element,
        pass: PassConfig,
        children: Option<&str>,
    ) -> bool {
        if element.has_class(&self.markers.visible) || !self.is_near(element, pass.margin_px) {
            return false;
        }
        self.reveal(element, children.map(|selector| (selector, pass.base_delay_ms)));
        true
    }

    /// Mark `element` visible, then stagger its `.animate-child` descendants
    /// and, when given, the `(selector, base delay)` children.
    fn reveal(&self, element: &D::Element, children: Option<(&str, u32)>) {
        element.add_class(&self.markers.visible);

        let step = self.motion.stagger_step_ms;
        self.stagger(
            element.query_all(&self.selectors.animate_children),
            StaggerPlan::new(self.motion.child_base_ms, step),
        );

        if let Some((selector, base_ms)) = children {
            self.stagger(element.query_all(selector), StaggerPlan::new(base_ms, step));
        }
    }

    fn is_near(&self, element: &D::Element, margin: f64) -> bool {
        match ViewportWindow::new(self.document.viewport_height(), margin) {
            Ok(window) => window.contains(&element.bounding_rect()),
            Err(e) => {
                tracing::debug!(error = %e, "skipping eager check");
                false
            }
        }
    }

    fn is_grid_host(&self, element: &D::Element) -> bool {
        element.has_class(&self.markers.values_grid)
            || element.has_class(&self.markers.content_section)
            || element.has_class(&self.markers.page_content)
    }

    fn is_stagger_section(&self, element: &D::Element) -> bool {
        element.has_class(&self.markers.values_grid)
            || element.has_class(&self.markers.content_section)
    }

    /// Schedule children not yet visible or pending, in index order.
    fn stagger(&self, children: Vec<D::Element>, plan: StaggerPlan) -> usize {
        let queued: Vec<D::Element> = children
            .into_iter()
            .filter(|child| !child.has_class(&self.markers.visible) && !self.is_pending(child))
            .collect();

        for (index, child) in queued.iter().enumerate() {
            self.schedule_reveal(child.clone(), plan.delay_for(index));
        }
        queued.len()
    }

    fn is_pending(&self, element: &D::Element) -> bool {
        self.pending
            .borrow()
            .iter()
            .any(|reveal| reveal.token.is_pending() && reveal.element == *element)
    }

    fn schedule_reveal(&self, element: D::Element, delay_ms: u32) {
        let token = CancelToken::new();
        {
            let mut pending = self.pending.borrow_mut();
            pending.retain(|reveal| reveal.token.is_pending());
            pending.push(PendingReveal {
                element: element.clone(),
                token: token.clone(),
            });
        }

        let visible = self.markers.visible.clone();
        self.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if !element.is_connected() {
                    token.cancel();
                    return;
                }
                if token.fire() {
                    element.add_class(&visible);
                }
            }),
        );
    }
}

fn push_unique<E: PartialEq>(items: &mut Vec<E>, item: E) {
    if !items.contains(&item) {
        items.push(item);
    }
}
