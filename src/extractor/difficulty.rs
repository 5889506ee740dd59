use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::extractor::dom::{element_text, page_text, select_all};
use crate::extractor::model::Difficulty;
use crate::extractor::strategy::StrategyChain;

const DIFFICULTY_SELECTORS: &[&str] = &[
    "[diff]",
    "[data-difficulty]",
    r#"div[class*="text-difficulty-"]"#,
    r#"[class*="difficulty"]"#,
    "div.text-olive, div.text-yellow, div.text-pink",
];

/// Explicit attributes, highest priority first.
const DIFFICULTY_ATTRIBUTES: &[&str] = &["data-difficulty", "diff", "data-degree"];

static DIFFICULTY_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(easy|medium|hard)\b").unwrap());

pub fn extract_difficulty(document: &Html) -> Option<Difficulty> {
    DIFFICULTY_SELECTORS
        .iter()
        .fold(StrategyChain::new("difficulty"), |chain, css| {
            chain.then(*css, move |doc: &Html| {
                select_all(doc, css).into_iter().find_map(from_element)
            })
        })
        .then("page-text", |doc: &Html| find_word(&page_text(doc)))
        .first(document)
}

fn from_element(element: ElementRef<'_>) -> Option<Difficulty> {
    let value = element.value();

    DIFFICULTY_ATTRIBUTES
        .iter()
        .filter_map(|name| value.attr(name))
        .find_map(Difficulty::from_word)
        .or_else(|| value.classes().find_map(from_class))
        .or_else(|| find_word(&element_text(element)))
}

fn find_word(text: &str) -> Option<Difficulty> {
    DIFFICULTY_WORD
        .captures(text)
        .and_then(|caps| Difficulty::from_word(&caps[1]))
}

fn from_class(class: &str) -> Option<Difficulty> {
    let class = class.to_ascii_lowercase();
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .into_iter()
        .find(|level| class.contains(&level.as_str().to_ascii_lowercase()))
}
