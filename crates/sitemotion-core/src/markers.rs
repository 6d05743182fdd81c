//! Class-name contract with the host page and its stylesheet.
//!
//! Every class the runtime reads or writes is named here so a site with
//! different conventions can remap them through configuration.

use serde::{Deserialize, Serialize};

/// Marker classes consumed and produced by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Participates in scroll-triggered animation
    pub animate_on_scroll: String,
    /// Participates in load-triggered animation
    pub animate_on_load: String,
    /// Currently visible
    pub visible: String,
    /// Staggered child of a visible parent
    pub animate_child: String,
    pub grid_item: String,
    pub content_card: String,
    pub values_grid: String,
    pub content_section: String,
    pub page_content: String,
    pub cta_section: String,
    pub involvement_section: String,
    pub footer_container: String,
    pub footer_col: String,
    pub hero: String,
    pub hero_content: String,
    pub page_header: String,
    pub internal_header: String,
    pub menu_toggle: String,
    /// Set on an open toggle and its nav
    pub active: String,
    /// Set on the body while any menu is open
    pub menu_open: String,
    pub nav_cta: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            animate_on_scroll: "animate-on-scroll".to_string(),
            animate_on_load: "animate-on-load".to_string(),
            visible: "is-visible".to_string(),
            animate_child: "animate-child".to_string(),
            grid_item: "grid-item".to_string(),
            content_card: "content-card".to_string(),
            values_grid: "values-grid".to_string(),
            content_section: "content-section".to_string(),
            page_content: "page-content".to_string(),
            cta_section: "cta-section".to_string(),
            involvement_section: "involvement-section".to_string(),
            footer_container: "footer-container".to_string(),
            footer_col: "footer-col".to_string(),
            hero: "hero".to_string(),
            hero_content: "hero-content".to_string(),
            page_header: "page-header".to_string(),
            internal_header: "internal-header".to_string(),
            menu_toggle: "mobile-menu-toggle".to_string(),
            active: "active".to_string(),
            menu_open: "menu-open".to_string(),
            nav_cta: "nav-cta".to_string(),
        }
    }
}

/// CSS selectors derived once from [`Markers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// Elements stripped and forced visible in reduced-motion mode
    pub reduced_motion_targets: String,
    /// Sections checked by the eager pass
    pub eager_sections: String,
    pub content_sections: String,
    /// Section-level elements registered for scroll reveal
    pub scroll_sections: String,
    pub animate_on_scroll: String,
    pub animate_on_load: String,
    pub animate_children: String,
    /// Grid entries and content cards revealed after their parent
    pub stagger_children: String,
    pub cards: String,
    pub load_header: String,
    pub hero_content: String,
    pub page_header: String,
    pub footer_container: String,
    pub footer_cols: String,
    pub menu_toggles: String,
    pub navs: String,
    pub nav_links: String,
    /// Links inside a paired menu element
    pub menu_links: String,
    pub nav_cta_links: String,
    pub anchors: String,
}

impl Selectors {
    /// Build the selector set for a marker configuration.
    #[must_use]
    pub fn new(m: &Markers) -> Self {
        Self {
            reduced_motion_targets: format!(
                "[class*=\"animate-\"], .{}, .{}, .{}",
                m.animate_on_scroll, m.animate_on_load, m.animate_child
            ),
            eager_sections: format!(
                ".{vg}, .{cs}, section:not(.{hero}):not(.{ph}):not(.{inv}), .{pc}",
                vg = m.values_grid,
                cs = m.content_section,
                hero = m.hero,
                ph = m.page_header,
                inv = m.involvement_section,
                pc = m.page_content,
            ),
            content_sections: format!(".{}", m.content_section),
            scroll_sections: format!(
                "section, .{}, .{}, .{}, .{}, .{}, footer",
                m.content_section, m.cta_section, m.values_grid, m.involvement_section, m.page_content
            ),
            animate_on_scroll: format!(".{}", m.animate_on_scroll),
            animate_on_load: format!(".{}", m.animate_on_load),
            animate_children: format!(".{}", m.animate_child),
            stagger_children: format!(".{}, .{}", m.grid_item, m.content_card),
            cards: format!(".{}", m.content_card),
            load_header: format!("header:not(.{})", m.internal_header),
            hero_content: format!(".{}", m.hero_content),
            page_header: format!(".{}", m.page_header),
            footer_container: format!(".{}", m.footer_container),
            footer_cols: format!(".{}", m.footer_col),
            menu_toggles: format!(".{}", m.menu_toggle),
            navs: "nav".to_string(),
            nav_links: "nav a".to_string(),
            menu_links: "a".to_string(),
            nav_cta_links: format!("nav .{} a", m.nav_cta),
            anchors: "a[href^=\"#\"]".to_string(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self::new(&Markers::default())
    }
}
