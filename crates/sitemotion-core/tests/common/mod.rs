//! In-memory page, manual clock and recording watcher for driving the core
//! against realistic markup without a browser.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::arithmetic_side_effects)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use sitemotion_core::geometry::Rect;
use sitemotion_core::host::{Document, Element, Scheduler, Watcher};

// ============================================================================
// Elements
// ============================================================================

struct NodeData {
    tag: String,
    classes: RefCell<Vec<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    rect: Cell<Rect>,
    children: RefCell<Vec<FakeElement>>,
    parent: RefCell<Weak<NodeData>>,
    is_root: bool,
}

#[derive(Clone)]
pub struct FakeElement(Rc<NodeData>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} class=\"{}\">", self.0.tag, self.0.classes.borrow().join(" "))
    }
}

impl FakeElement {
    fn build(tag: &str, is_root: bool) -> Self {
        Self(Rc::new(NodeData {
            tag: tag.to_string(),
            classes: RefCell::new(Vec::new()),
            attributes: RefCell::new(BTreeMap::new()),
            styles: RefCell::new(BTreeMap::new()),
            rect: Cell::new(Rect::default()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            is_root,
        }))
    }

    pub fn new(tag: &str) -> Self {
        Self::build(tag, false)
    }

    pub fn class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Place the element `top` pixels below the viewport top.
    pub fn at(self, top: f64, height: f64) -> Self {
        self.set_rect(Rect::from_top(top, height));
        self
    }

    pub fn set_rect(&self, rect: Rect) {
        self.0.rect.set(rect);
    }

    /// Append `child` and return it.
    pub fn append(&self, child: Self) -> Self {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
        child
    }

    pub fn detach(&self) {
        let parent = self.0.parent.borrow().upgrade();
        if let Some(parent) = parent {
            parent.children.borrow_mut().retain(|c| c != self);
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.classes.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.has_class("is-visible")
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        for child in self.0.children.borrow().iter() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    fn matches(&self, selector: &str) -> bool {
        parse_selector_list(selector)
            .iter()
            .any(|complex| matches_complex(self, complex))
    }
}

impl Element for FakeElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.classes.borrow_mut().push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn bounding_rect(&self) -> Rect {
        self.0.rect.get()
    }

    fn query_all(&self, selector: &str) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|e| e.matches(selector))
            .collect()
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let mut current = Some(self.clone());
        while let Some(element) = current {
            if element.matches(selector) {
                return Some(element);
            }
            current = element.parent();
        }
        None
    }

    fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(element) = current {
            if element == *self {
                return true;
            }
            current = element.parent();
        }
        false
    }

    fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.0.is_root {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(name).cloned()
    }

    fn style_property(&self, name: &str) -> String {
        self.0.styles.borrow().get(name).cloned().unwrap_or_default()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.0
            .styles
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }
}

// ============================================================================
// Selector subset: tag, .class, :not(.class), [attr*="v"], [attr^="v"],
// descendant combinator, comma lists
// ============================================================================

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    not_classes: Vec<String>,
    attr_contains: Vec<(String, String)>,
    attr_prefix: Vec<(String, String)>,
}

fn parse_selector_list(selector: &str) -> Vec<Vec<Compound>> {
    selector
        .split(',')
        .map(|complex| complex.split_whitespace().map(parse_compound).collect())
        .collect()
}

fn is_boundary(ch: char) -> bool {
    ch == '.' || ch == ':' || ch == '['
}

fn parse_compound(text: &str) -> Compound {
    let mut compound = Compound::default();
    let tag_end = text.find(is_boundary).unwrap_or(text.len());
    if tag_end > 0 {
        compound.tag = Some(text[..tag_end].to_string());
    }

    let mut rest = &text[tag_end..];
    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix(":not(.") {
            let end = r.find(')').expect("unterminated :not(");
            compound.not_classes.push(r[..end].to_string());
            rest = &r[end + 1..];
        } else if let Some(r) = rest.strip_prefix('.') {
            let end = r.find(is_boundary).unwrap_or(r.len());
            compound.classes.push(r[..end].to_string());
            rest = &r[end..];
        } else if let Some(r) = rest.strip_prefix('[') {
            let end = r.find(']').expect("unterminated attribute selector");
            let body = &r[..end];
            if let Some((name, value)) = body.split_once("*=") {
                compound
                    .attr_contains
                    .push((name.to_string(), value.trim_matches('"').to_string()));
            } else if let Some((name, value)) = body.split_once("^=") {
                compound
                    .attr_prefix
                    .push((name.to_string(), value.trim_matches('"').to_string()));
            } else {
                panic!("unsupported attribute selector: {body}");
            }
            rest = &r[end + 1..];
        } else {
            panic!("unsupported selector: {text}");
        }
    }
    compound
}

fn attribute_text(element: &FakeElement, name: &str) -> Option<String> {
    if name == "class" {
        Some(element.classes().join(" "))
    } else {
        element.attribute(name)
    }
}

fn matches_compound(element: &FakeElement, compound: &Compound) -> bool {
    compound.tag.as_ref().is_none_or(|tag| *tag == element.0.tag)
        && compound.classes.iter().all(|c| element.has_class(c))
        && !compound.not_classes.iter().any(|c| element.has_class(c))
        && compound
            .attr_contains
            .iter()
            .all(|(name, value)| attribute_text(element, name).is_some_and(|t| t.contains(value.as_str())))
        && compound
            .attr_prefix
            .iter()
            .all(|(name, value)| attribute_text(element, name).is_some_and(|t| t.starts_with(value.as_str())))
}

fn matches_complex(element: &FakeElement, complex: &[Compound]) -> bool {
    let Some((last, ancestors)) = complex.split_last() else {
        return false;
    };
    if !matches_compound(element, last) {
        return false;
    }

    let mut remaining = ancestors;
    let mut current = element.parent();
    while let Some((next, rest)) = remaining.split_last() {
        loop {
            let Some(candidate) = current else {
                return false;
            };
            current = candidate.parent();
            if matches_compound(&candidate, next) {
                break;
            }
        }
        remaining = rest;
    }
    true
}

// ============================================================================
// Document
// ============================================================================

#[derive(Clone)]
pub struct FakePage {
    pub root: FakeElement,
    pub body: FakeElement,
    height: Rc<Cell<f64>>,
    width: Rc<Cell<f64>>,
    reduced_motion: bool,
}

impl FakePage {
    pub fn new(width: f64, height: f64) -> Self {
        let root = FakeElement::build("html", true);
        let body = root.append(FakeElement::new("body"));
        Self {
            root,
            body,
            height: Rc::new(Cell::new(height)),
            width: Rc::new(Cell::new(width)),
            reduced_motion: false,
        }
    }

    pub fn with_reduced_motion(mut self) -> Self {
        self.reduced_motion = true;
        self
    }

    pub fn append(&self, element: FakeElement) -> FakeElement {
        self.body.append(element)
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }
}

impl Document for FakePage {
    type Element = FakeElement;

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.root.query_all(selector)
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.root
            .descendants()
            .into_iter()
            .find(|e| e.attribute("id").as_deref() == Some(id))
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.body.clone())
    }

    fn viewport_height(&self) -> f64 {
        self.height.get()
    }

    fn viewport_width(&self) -> f64 {
        self.width.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

// ============================================================================
// Clock
// ============================================================================

struct Scheduled {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Timeline {
    now: u64,
    seq: u64,
    tasks: Vec<Scheduled>,
}

/// Timer queue that only runs when the test advances it.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<RefCell<Timeline>>);

impl ManualClock {
    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    pub fn queued(&self) -> usize {
        self.0.borrow().tasks.len()
    }

    /// Run every task due within the next `ms` milliseconds, in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut timeline = self.0.borrow_mut();
                let position = timeline
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                position.map(|i| {
                    let task = timeline.tasks.remove(i);
                    timeline.now = task.due;
                    task
                })
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
        self.0.borrow_mut().now = target;
    }
}

impl Scheduler for ManualClock {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let mut timeline = self.0.borrow_mut();
        let due = timeline.now + u64::from(delay_ms);
        let seq = timeline.seq;
        timeline.seq += 1;
        timeline.tasks.push(Scheduled { due, seq, task });
    }
}

// ============================================================================
// Watcher
// ============================================================================

#[derive(Default)]
pub struct RecordingWatcher {
    observed: RefCell<Vec<FakeElement>>,
}

impl RecordingWatcher {
    pub fn observed(&self) -> Vec<FakeElement> {
        self.observed.borrow().clone()
    }

    pub fn is_watching(&self, element: &FakeElement) -> bool {
        self.observed.borrow().contains(element)
    }
}

impl Watcher<FakeElement> for RecordingWatcher {
    fn observe(&self, element: &FakeElement) {
        self.observed.borrow_mut().push(element.clone());
    }
}
