use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::extractor::dom::{element_text, in_discussion, select_all};
use crate::extractor::strategy::StrategyChain;

/// Most specific first.
const TITLE_SELECTORS: &[&str] = &[
    r#"[data-cy="question-title"]"#,
    r#"div.text-title-large a[href*="/problems/"]"#,
    "div.text-title-large",
    r#"[class*="question-title"]"#,
    r#"a[href*="/problems/"][class*="title"]"#,
    "h1",
    "h3",
];

/// "146. LRU Cache" -> ("146", "LRU Cache").
static NUMBERED_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleOutcome {
    pub title: Option<String>,
    /// Digits split off a "<n>. " prefix.
    pub number: Option<String>,
    /// False when the title came from the URL slug.
    pub from_page: bool,
}

pub fn extract_title(document: &Html, slug_title: Option<&str>) -> TitleOutcome {
    let chain = TITLE_SELECTORS
        .iter()
        .fold(StrategyChain::new("title"), |chain, css| {
            chain.then(*css, move |doc: &Html| {
                select_all(doc, css)
                    .into_iter()
                    .filter(|element| !in_discussion(*element))
                    .map(element_text)
                    .find(|text| !text.is_empty())
            })
        });

    match chain.first(document) {
        Some(text) => split_numbered(&text),
        None => TitleOutcome {
            title: slug_title.map(str::to_string),
            number: None,
            from_page: false,
        },
    }
}

fn split_numbered(text: &str) -> TitleOutcome {
    match NUMBERED_TITLE.captures(text) {
        Some(caps) => TitleOutcome {
            title: Some(caps[2].trim().to_string()),
            number: Some(caps[1].to_string()),
            from_page: true,
        },
        None => TitleOutcome {
            title: Some(text.to_string()),
            number: None,
            from_page: true,
        },
    }
}
