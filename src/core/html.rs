// src/core/html.rs
use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;

/// Compile a CSS selector, logging instead of failing on bad input.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            logw!("Ignoring invalid selector {css:?}: {e}");
            None
        }
    }
}

/// Rendered-ish text of an element: all descendant text, whitespace collapsed.
pub fn visible_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    normalize_ws(&raw)
}

/// True if any ancestor is one of `tags` (lowercase tag names).
pub fn has_ancestor(el: ElementRef<'_>, tags: &[&str]) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| tags.contains(&a.value().name()))
}

/// Nearest ancestor `<a>` carrying an href.
pub fn enclosing_link(el: ElementRef<'_>) -> Option<&str> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a" && a.value().attr("href").is_some())
        .and_then(|a| a.value().attr("href"))
}
