//! HtmlSanitizer port - cleans CRM-authored rich text before storage.

/// Strips unsafe markup from free-text HTML.
///
/// Returns `None` when nothing meaningful remains.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, html: Option<&str>) -> Option<String>;
}
