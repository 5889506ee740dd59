use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

static PROBLEM_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/problems/([^/?#]+)").unwrap());

/// Slug number patterns, tried in order.
static SLUG_NUMBER_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"^(\d+)[-_]").unwrap(),
        Regex::new(r"^(\d+)\.").unwrap(),
        Regex::new(r"(\d+)").unwrap(),
    ]
});

/// What the URL alone says about the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageClass {
    pub is_problem_page: bool,
    pub slug: Option<String>,
    pub slug_number: Option<String>,
    pub slug_title: Option<String>,
}

pub fn classify(url: &Url) -> PageClass {
    classify_path(url.path())
}

pub fn classify_path(path: &str) -> PageClass {
    let Some(raw_slug) = PROBLEM_PATH.captures(path).and_then(|caps| caps.get(1)) else {
        return PageClass::default();
    };

    let slug = percent_decode_str(raw_slug.as_str())
        .decode_utf8_lossy()
        .into_owned();

    PageClass {
        is_problem_page: true,
        slug_number: slug_number(&slug),
        slug_title: slug_title(&slug),
        slug: Some(slug),
    }
}

/// "two-sum" -> "Two Sum".
fn slug_title(slug: &str) -> Option<String> {
    let words: Vec<String> = slug
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn slug_number(slug: &str) -> Option<String> {
    SLUG_NUMBER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(slug))
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str().to_string())
}
