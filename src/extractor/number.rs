use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::extractor::dom::{element_text, page_text, select_all};
use crate::extractor::strategy::StrategyChain;

const NUMBER_SELECTORS: &[&str] = &[
    "div.text-title-large",
    r#"[data-cy="question-title"]"#,
    r#"a[href*="/problems/"]"#,
    r#"[class*="title"]"#,
];

/// Page-text numbers outside this range are treated as noise.
const PLAUSIBLE_NUMBERS: RangeInclusive<u32> = 1..=9999;

static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s").unwrap());

static PAGE_NUMBER_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"Problem\s+(\d+)").unwrap(),
        Regex::new(r"#(\d+)").unwrap(),
        Regex::new(r"(\d+)\.\s+[A-Z][a-z]+").unwrap(),
    ]
});

/// Number lookup used when the title did not carry one.
pub fn extract_number(document: &Html, slug_number: Option<&str>) -> Option<String> {
    StrategyChain::new("number")
        .then("numbered-element", |doc: &Html| {
            NUMBER_SELECTORS.iter().find_map(|css| {
                select_all(doc, css).into_iter().find_map(|element| {
                    NUMBER_PREFIX
                        .captures(&element_text(element))
                        .map(|caps| caps[1].to_string())
                })
            })
        })
        .then("slug", |_: &Html| slug_number.map(str::to_string))
        .then("page-text", |doc: &Html| number_from_text(&page_text(doc)))
        .first(document)
}

fn number_from_text(text: &str) -> Option<String> {
    PAGE_NUMBER_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find(|digits| {
                digits
                    .as_str()
                    .parse::<u32>()
                    .is_ok_and(|n| PLAUSIBLE_NUMBERS.contains(&n))
            })
            .map(|digits| digits.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_element_beats_slug() {
        let document = Html::parse_document(
            r#"<a href="/problems/two-sum/" class="truncate">1. Two Sum</a>"#,
        );
        assert_eq!(extract_number(&document, Some("7")).as_deref(), Some("1"));
    }

    #[test]
    fn test_slug_number_beats_page_text() {
        let document = Html::parse_document("<p>Problem 55</p>");
        assert_eq!(extract_number(&document, Some("12")).as_deref(), Some("12"));
    }

    #[test]
    fn test_page_text_patterns_in_order() {
        let document = Html::parse_document("<p>See #77 and Problem 88</p>");
        assert_eq!(extract_number(&document, None).as_deref(), Some("88"));

        let document = Html::parse_document("<p>Tagged #77 today</p>");
        assert_eq!(extract_number(&document, None).as_deref(), Some("77"));

        let document = Html::parse_document("<p>3. Longest Substring</p>");
        assert_eq!(extract_number(&document, None).as_deref(), Some("3"));
    }

    #[test]
    fn test_page_text_rejects_implausible_numbers() {
        let document = Html::parse_document("<p>#0 #123456 #42</p>");
        assert_eq!(extract_number(&document, None).as_deref(), Some("42"));

        let document = Html::parse_document("<p>Accepted 12,345,678</p>");
        assert_eq!(extract_number(&document, None), None);
    }
}
