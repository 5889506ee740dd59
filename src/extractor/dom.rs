//! Read-only helpers over a parsed document. Lookup failures never escape:
//! an unparseable selector behaves like a selector that matched nothing.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extractor::model::normalize_whitespace;

/// Class/id fragments marking a discussion or comment thread.
const DISCUSSION_MARKERS: &[&str] = &["discussion", "comment"];

/// Elements whose text is never visible page copy.
const HIDDEN_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

pub fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(err) => {
            debug!(selector = css, error = %err, "skipping unparseable selector");
            Vec::new()
        }
    }
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// True when the element sits inside a discussion or comment region.
pub fn in_discussion(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| {
            let value = ancestor.value();
            let class = value.attr("class").unwrap_or_default();
            let id = value.attr("id").unwrap_or_default();
            let haystack = format!("{class} {id}").to_ascii_lowercase();
            DISCUSSION_MARKERS
                .iter()
                .any(|marker| haystack.contains(marker))
        })
}

/// Visible text of the whole page body, text nodes joined by single spaces.
pub fn page_text(document: &Html) -> String {
    let body = select_all(document, "body")
        .into_iter()
        .next()
        .unwrap_or_else(|| document.root_element());

    let chunks: Vec<&str> = body
        .descendants()
        .filter(|node| {
            node.parent()
                .and_then(ElementRef::wrap)
                .is_none_or(|parent| !HIDDEN_TEXT_PARENTS.contains(&parent.value().name()))
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect();

    chunks.join(" ")
}
