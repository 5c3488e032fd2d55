//! Ammonia-backed implementation of `HtmlSanitizer`.
//!
//! Uses ammonia's default allow-list: basic formatting, links and lists
//! survive, while scripts, styles and event-handler attributes are removed.

use crate::ports::HtmlSanitizer;

#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl AmmoniaSanitizer {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: Option<&str>) -> Option<String> {
        let html = html?;
        let cleaned = ammonia::clean(html);
        if cleaned.trim().is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}
