//! Runtime configuration
//!
//! A page may embed a JSON document in
//! `<script type="application/json" id="sitemotion-config">`. Every field is
//! optional; omitted fields keep the defaults below.
//!
//! ```
//! use sitemotion_core::config::Config;
//!
//! let config = Config::from_json(r#"{ "nav": { "breakpoint_px": 1024 } }"#)?;
//! assert!((config.nav.breakpoint_px - 1024.0).abs() < f64::EPSILON);
//! assert_eq!(config.motion.stagger_step_ms, 100);
//! # Ok::<(), sitemotion_core::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markers::Markers;

/// Id of the element holding the page's JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "sitemotion-config";

/// Accepted `log_level` values.
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markers: Markers,
    pub motion: MotionConfig,
    pub nav: NavConfig,
    pub scroll: ScrollConfig,
    /// Console verbosity, one of [`LOG_LEVELS`]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            motion: MotionConfig::default(),
            nav: NavConfig::default(),
            scroll: ScrollConfig::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParseFailed` for malformed JSON and `InvalidConfig` when a
    /// field fails [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::config_parse_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.motion.validate()?;
        self.nav.validate()?;
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::invalid_config(
                "log_level",
                format!("expected one of {LOG_LEVELS:?}, got '{}'", self.log_level),
            ));
        }
        Ok(())
    }
}

/// One eager pass: how far outside the viewport it looks and when the
/// revealed element's children start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassConfig {
    pub margin_px: f64,
    pub base_delay_ms: u32,
}

impl PassConfig {
    #[must_use]
    pub const fn new(margin_px: f64, base_delay_ms: u32) -> Self {
        Self {
            margin_px,
            base_delay_ms,
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            return Err(Error::invalid_config(
                format!("{field}.margin_px"),
                format!("must be a non-negative number, got {}", self.margin_px),
            ));
        }
        Ok(())
    }
}

/// Intersection watcher options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// CSS margin string applied to the root viewport
    pub root_margin: String,
    /// Visible fraction that counts as intersecting
    pub threshold: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            root_margin: "0px 0px -50px 0px".to_string(),
            threshold: 0.05,
        }
    }
}

/// Visibility animator timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Delay between consecutive children of a staggered group
    pub stagger_step_ms: u32,
    pub observer: ObserverConfig,
    /// Main eager pass over sections
    pub section_pass: PassConfig,
    /// Eager pass over nested content sections
    pub nested_pass: PassConfig,
    /// Lenient pass once layout has settled
    pub settle_pass: PassConfig,
    /// Offset of `.animate-child` reveals after their parent is revealed
    pub child_base_ms: u32,
    /// Offset of grid items after their grid host intersects
    pub grid_base_ms: u32,
    /// Offset of cards inside nested sections revealed by an intersection
    pub nested_card_base_ms: u32,
    /// Delays at which the section pass re-runs after boot
    pub rescan_delays_ms: Vec<u32>,
    /// Delay of the lenient pass
    pub settle_delay_ms: u32,
    /// Per-index animation delay of load-triggered elements and footer columns
    pub load_step_ms: u32,
    /// Re-run the section pass on window load and when web fonts are ready
    pub rescan_on_layout_signals: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            stagger_step_ms: 100,
            observer: ObserverConfig::default(),
            section_pass: PassConfig::new(200.0, 100),
            nested_pass: PassConfig::new(300.0, 150),
            settle_pass: PassConfig::new(500.0, 200),
            child_base_ms: 0,
            grid_base_ms: 300,
            nested_card_base_ms: 400,
            rescan_delays_ms: vec![100, 500, 1000],
            settle_delay_ms: 1500,
            load_step_ms: 100,
            rescan_on_layout_signals: true,
        }
    }
}

impl MotionConfig {
    fn validate(&self) -> Result<()> {
        if self.stagger_step_ms == 0 {
            return Err(Error::invalid_config(
                "motion.stagger_step_ms",
                "must be greater than zero",
            ));
        }
        let threshold = self.observer.threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(Error::invalid_config(
                "motion.observer.threshold",
                format!("must be within 0..=1, got {threshold}"),
            ));
        }
        self.section_pass.validate("motion.section_pass")?;
        self.nested_pass.validate("motion.nested_pass")?;
        self.settle_pass.validate("motion.settle_pass")?;
        if self.rescan_delays_ms.windows(2).any(|w| matches!(w, [a, b] if a >= b)) {
            return Err(Error::invalid_config(
                "motion.rescan_delays_ms",
                "must be strictly increasing",
            ));
        }
        Ok(())
    }
}

/// Mobile navigation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Viewport width above which menus are force-closed
    pub breakpoint_px: f64,
    /// Toggle attribute naming the id of its nav
    pub pairing_attribute: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 992.0,
            pairing_attribute: "aria-controls".to_string(),
        }
    }
}

impl NavConfig {
    fn validate(&self) -> Result<()> {
        if !self.breakpoint_px.is_finite() || self.breakpoint_px <= 0.0 {
            return Err(Error::invalid_config(
                "nav.breakpoint_px",
                format!("must be a positive number, got {}", self.breakpoint_px),
            ));
        }
        Ok(())
    }
}

/// Anchor scrolling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub enabled: bool,
    /// Jump instead of animating when reduced motion is requested
    pub respect_reduced_motion: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            respect_reduced_motion: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() -> Result<()> {
        Config::default().validate()
    }

    #[test]
    fn test_empty_document_yields_defaults() -> Result<()> {
        let config = Config::from_json("{}")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() -> Result<()> {
        let config = Config::from_json(
            r#"{ "motion": { "stagger_step_ms": 80, "rescan_delays_ms": [200, 800] },
                 "markers": { "visible": "shown" } }"#,
        )?;
        assert_eq!(config.motion.stagger_step_ms, 80);
        assert_eq!(config.motion.rescan_delays_ms, vec![200, 800]);
        assert_eq!(config.motion.settle_delay_ms, 1500);
        assert_eq!(config.markers.visible, "shown");
        assert_eq!(config.markers.animate_on_scroll, "animate-on-scroll");
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = Config::from_json("{ nope");
        assert!(matches!(result, Err(Error::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let result = Config::from_json(r#"{ "motion": { "observer": { "threshold": 1.5 } } }"#);
        assert!(matches!(
            result,
            Err(Error::InvalidConfig { ref field, .. }) if field == "motion.observer.threshold"
        ));
    }

    #[test]
    fn test_rejects_zero_stagger_step() {
        let result = Config::from_json(r#"{ "motion": { "stagger_step_ms": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_unsorted_rescan_delays() {
        let result = Config::from_json(r#"{ "motion": { "rescan_delays_ms": [500, 100] } }"#);
        assert!(matches!(
            result,
            Err(Error::InvalidConfig { ref field, .. }) if field == "motion.rescan_delays_ms"
        ));
    }

    #[test]
    fn test_rejects_negative_pass_margin() {
        let result = Config::from_json(
            r#"{ "motion": { "nested_pass": { "margin_px": -1, "base_delay_ms": 0 } } }"#,
        );
        assert!(matches!(
            result,
            Err(Error::InvalidConfig { ref field, .. }) if field == "motion.nested_pass.margin_px"
        ));
    }

    #[test]
    fn test_rejects_bad_breakpoint_and_log_level() {
        assert!(Config::from_json(r#"{ "nav": { "breakpoint_px": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "log_level": "loud" }"#).is_err());
    }
}
