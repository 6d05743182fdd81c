//! Host-independent core of sitemotion
//!
//! Presentation behavior for static marketing pages: scroll-triggered reveals,
//! staggered entrance of grid items and cards, a mobile navigation toggle, and
//! smooth same-page anchor scrolling.
//!
//! ## Architecture
//! - All decisions are made here, against the [`host`] traits
//! - `sitemotion-web` implements those traits over `web-sys` and wires events
//! - Tests implement them over an in-memory page and a manual clock
//!
//! ## Module Structure
//! - `animator`: eager passes, intersection reveals, re-scan schedule
//! - `nav`: menu open/closed state and marker synchronization
//! - `anchor`: same-page anchor resolution
//! - `stagger`: per-child delay plans
//! - `cancel`: cancellation tokens for scheduled reveals
//! - `geometry`: expanded-viewport checks
//! - `markers`: class-name contract with the page
//! - `config`: JSON configuration
//! - `error`: error types

#![forbid(unsafe_code)]

pub mod anchor;
pub mod animator;
pub mod cancel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod markers;
pub mod nav;
pub mod stagger;

pub use animator::{Animator, InitOutcome};
pub use config::Config;
pub use error::{Error, Result};
pub use nav::{NavController, NavEvent, NavState};
