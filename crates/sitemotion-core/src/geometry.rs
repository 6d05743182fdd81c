//! Viewport geometry for the eager visibility pass
//!
//! An element counts as "near" the viewport when its bounding box overlaps the
//! visible area extended by a fixed margin above and below.

use crate::error::{Error, Result};

/// Vertical extent of an element relative to the viewport top, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Rect starting at `top` with the given height.
    #[must_use]
    pub fn from_top(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }
}

/// The visible viewport expanded by `margin` pixels above and below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportWindow {
    height: f64,
    margin: f64,
}

impl ViewportWindow {
    /// Create an expanded viewport window.
    ///
    /// # Errors
    ///
    /// Returns an error if the height or margin is negative or not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use sitemotion_core::geometry::{Rect, ViewportWindow};
    ///
    /// let window = ViewportWindow::new(800.0, 200.0)?;
    /// assert!(window.contains(&Rect::new(950.0, 1200.0)));
    /// assert!(!window.contains(&Rect::new(1800.0, 2100.0)));
    /// # Ok::<(), sitemotion_core::Error>(())
    /// ```
    pub fn new(height: f64, margin: f64) -> Result<Self> {
        if !height.is_finite() || height < 0.0 {
            return Err(Error::invalid_viewport(format!("height {height}")));
        }
        if !margin.is_finite() || margin < 0.0 {
            return Err(Error::invalid_viewport(format!("margin {margin}")));
        }
        Ok(Self { height, margin })
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Whether `rect` overlaps the expanded window.
    #[must_use]
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.top < self.height + self.margin && rect.bottom > -self.margin
    }
}
