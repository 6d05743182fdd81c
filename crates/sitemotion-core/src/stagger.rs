//! Staggered reveal timing
//!
//! A group of children reveals one after another: child `i` fires at
//! `base + i * step` milliseconds, so delays strictly increase with index as
//! long as `step > 0` and the sum stays below `u32::MAX`.

/// Delay plan for one staggered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerPlan {
    base_ms: u32,
    step_ms: u32,
}

impl StaggerPlan {
    #[must_use]
    pub const fn new(base_ms: u32, step_ms: u32) -> Self {
        Self { base_ms, step_ms }
    }

    #[must_use]
    pub const fn base_ms(&self) -> u32 {
        self.base_ms
    }

    #[must_use]
    pub const fn step_ms(&self) -> u32 {
        self.step_ms
    }

    /// Delay for the child at `index`. Saturates at `u32::MAX`.
    ///
    /// ```
    /// use sitemotion_core::stagger::StaggerPlan;
    ///
    /// let plan = StaggerPlan::new(300, 100);
    /// assert_eq!(plan.delay_for(0), 300);
    /// assert_eq!(plan.delay_for(4), 700);
    /// ```
    #[must_use]
    pub fn delay_for(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_ms
            .saturating_add(self.step_ms.saturating_mul(index))
    }

    /// Delays for the first `count` children, in index order.
    pub fn delays(&self, count: usize) -> impl Iterator<Item = u32> + '_ {
        (0..count).map(|index| self.delay_for(index))
    }
}

/// Format a millisecond delay as a CSS time value.
#[must_use]
pub fn css_millis(ms: u32) -> String {
    format!("{ms}ms")
}
