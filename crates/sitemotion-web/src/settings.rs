//! Page-embedded configuration

use sitemotion_core::config::{CONFIG_ELEMENT_ID, Config};
use sitemotion_core::Result;

use crate::dom::WebDocument;

/// Read the JSON configuration embedded in the page, if any.
///
/// # Errors
///
/// Returns the parse or validation error of a malformed configuration.
pub fn load(document: &WebDocument) -> Result<Option<Config>> {
    let Some(element) = document.raw().get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Ok(None);
    };
    let text = element.text_content().unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(None);
    }
    Config::from_json(&text).map(Some)
}
