//! Cancellation tokens for scheduled reveals
//!
//! A token starts `Pending` and moves exactly once, either to `Fired` when its
//! timer runs or to `Cancelled` when its element leaves the document first.

use std::cell::Cell;
use std::rc::Rc;

/// Lifecycle of one scheduled reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Pending,
    Fired,
    Cancelled,
}

/// Shared handle to a scheduled reveal's state.
#[derive(Debug, Clone)]
pub struct CancelToken(Rc<Cell<TokenState>>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(TokenState::Pending)))
    }

    #[must_use]
    pub fn state(&self) -> TokenState {
        self.0.get()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == TokenState::Pending
    }

    /// Cancel the reveal. Returns `false` if it had already fired or been cancelled.
    pub fn cancel(&self) -> bool {
        self.transition(TokenState::Cancelled)
    }

    /// Claim the reveal for execution. Returns `false` if it is no longer pending.
    pub fn fire(&self) -> bool {
        self.transition(TokenState::Fired)
    }

    fn transition(&self, to: TokenState) -> bool {
        if self.is_pending() {
            self.0.set(to);
            true
        } else {
            false
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
