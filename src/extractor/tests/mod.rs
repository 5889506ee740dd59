use url::Url;

use crate::extractor::{Difficulty, SoftFailure, extract};
use crate::page::PageSnapshot;

const LRU_CACHE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>LRU Cache - LeetCode</title></head>
<body>
  <div id="qd-content">
    <div class="flex items-start">
      <div class="text-title-large font-semibold">
        <a href="/problems/lru-cache/" class="no-underline">146. LRU Cache</a>
      </div>
    </div>
    <div class="flex gap-1">
      <div class="relative inline-flex text-difficulty-medium">Medium</div>
      <div class="topic-tag">Hash Table</div>
    </div>
    <div data-track-load="description_content">
      <p>Design a data structure that follows the constraints of a Least Recently Used (LRU) cache.</p>
    </div>
  </div>
  <div class="discussion-panel">
    <h3>1. Someone else's favourite problem</h3>
    <p>This was easy for me</p>
  </div>
</body>
</html>"#;

const LOADING_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>LeetCode</title></head>
<body><div id="app"><div class="spinner"></div></div></body></html>"#;

fn snapshot(url: &str, html: &str) -> PageSnapshot {
    PageSnapshot::new(Url::parse(url).unwrap(), html)
}

#[test]
fn test_extract_full_problem_page() {
    let page = snapshot("https://leetcode.com/problems/lru-cache/", LRU_CACHE_PAGE);
    let result = extract(&page);

    assert!(result.on_problem);
    assert_eq!(result.problem_number.as_deref(), Some("146"));
    assert_eq!(result.problem_title.as_deref(), Some("LRU Cache"));
    assert_eq!(result.difficulty, Some(Difficulty::Medium));
    assert_eq!(result.url, "https://leetcode.com/problems/lru-cache/");
    assert_eq!(result.error, None);
}

#[test]
fn test_slug_fallback_when_page_not_rendered() {
    let page = snapshot("https://leetcode.com/problems/two-sum/", LOADING_PAGE);
    let result = extract(&page);

    assert!(result.on_problem);
    assert_eq!(result.problem_title.as_deref(), Some("Two Sum"));
    assert_eq!(result.problem_number, None);
    assert_eq!(result.difficulty, None);
}

#[test]
fn test_slug_digits_used_as_number() {
    let page = snapshot("https://leetcode.com/problems/1-two-sum/", LOADING_PAGE);
    let result = extract(&page);

    assert_eq!(result.problem_number.as_deref(), Some("1"));
    assert_eq!(result.problem_title.as_deref(), Some("1 Two Sum"));
}

#[test]
fn test_non_problem_page_short_circuits() {
    let page = snapshot("https://leetcode.com/explore/featured/", LRU_CACHE_PAGE);
    let result = extract(&page);

    assert!(!result.on_problem);
    assert_eq!(result.error, None);
    assert_eq!(result.problem_title, None);
}

#[test]
fn test_one_character_title_is_soft_failure() {
    let page = snapshot(
        "https://leetcode.com/problems/x/",
        r#"<div data-cy="question-title">X</div>"#,
    );
    let result = extract(&page);

    assert!(!result.on_problem);
    assert_eq!(result.failure(), Some(SoftFailure::InvalidTitle));
    assert_eq!(result.error.as_deref(), Some("Invalid title extracted"));
}

#[test]
fn test_extraction_is_idempotent() {
    let page = snapshot("https://leetcode.com/problems/lru-cache/", LRU_CACHE_PAGE);
    let first = extract(&page);
    let second = extract(&page);

    assert_eq!(first.problem_number, second.problem_number);
    assert_eq!(first.problem_title, second.problem_title);
    assert_eq!(first.difficulty, second.difficulty);
    assert_eq!(first.on_problem, second.on_problem);
}

#[test]
fn test_malformed_html() {
    let page = snapshot(
        "https://leetcode.com/problems/broken/",
        "<html><body><div data-cy=\"question-title\">7. Reverse Integer<div class=\"text-olive\">Easy",
    );
    let result = extract(&page);

    assert!(result.on_problem);
    assert_eq!(result.problem_number.as_deref(), Some("7"));
    assert!(
        result
            .problem_title
            .as_deref()
            .is_some_and(|title| title.starts_with("Reverse Integer"))
    );
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(
            html in ".*",
            path in "/[a-z/-]{0,40}"
        ) {
            let page = snapshot(&format!("https://leetcode.com{path}"), &html);
            let _ = extract(&page);
        }

        #[test]
        fn test_accepted_titles_are_long_enough(
            html in ".*",
            slug in "[a-z0-9-]{1,20}",
        ) {
            let page = snapshot(&format!("https://leetcode.com/problems/{slug}/"), &html);
            let result = extract(&page);
            if result.on_problem {
                let title = result.problem_title.unwrap_or_default();
                prop_assert!(title.trim().chars().count() >= 2);
            }
        }
    }
}
