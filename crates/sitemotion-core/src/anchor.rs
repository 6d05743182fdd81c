//! Same-page anchor resolution for smooth scrolling

use crate::config::ScrollConfig;
use crate::host::Document;

/// How an intercepted anchor click should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    Smooth,
    Instant,
}

/// Target id of a same-page anchor.
///
/// Only `#id` hrefs with a non-empty id qualify; the bare `#` does not.
///
/// ```
/// use sitemotion_core::anchor::fragment_id;
///
/// assert_eq!(fragment_id("#section2"), Some("section2"));
/// assert_eq!(fragment_id("#"), None);
/// assert_eq!(fragment_id("/about#team"), None);
/// ```
#[must_use]
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Element an anchor click should scroll to, if the page has one.
pub fn resolve<D: Document>(document: &D, href: &str) -> Option<D::Element> {
    fragment_id(href).and_then(|id| document.element_by_id(id))
}

#[must_use]
pub const fn scroll_motion(reduced_motion: bool, config: &ScrollConfig) -> ScrollMotion {
    if reduced_motion && config.respect_reduced_motion {
        ScrollMotion::Instant
    } else {
        ScrollMotion::Smooth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_id_rules() {
        assert_eq!(fragment_id("#top"), Some("top"));
        assert_eq!(fragment_id("#a"), Some("a"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id(""), None);
        assert_eq!(fragment_id("https://example.com/#top"), None);
    }

    #[test]
    fn test_scroll_motion_honors_reduced_motion() {
        let config = ScrollConfig::default();
        assert_eq!(scroll_motion(false, &config), ScrollMotion::Smooth);
        assert_eq!(scroll_motion(true, &config), ScrollMotion::Instant);

        let config = ScrollConfig {
            respect_reduced_motion: false,
            ..ScrollConfig::default()
        };
        assert_eq!(scroll_motion(true, &config), ScrollMotion::Smooth);
    }
}
