use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured record derived from a problem page.
///
/// Always built fresh by one of the constructors below and never mutated
/// afterwards. `on_problem == true` implies a title of at least
/// [`MIN_TITLE_CHARS`](crate::extractor::MIN_TITLE_CHARS) characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub on_problem: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub url: String,
    pub extracted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn success(
        url: impl Into<String>,
        problem_number: Option<String>,
        problem_title: String,
        difficulty: Option<Difficulty>,
    ) -> Self {
        Self {
            on_problem: true,
            problem_number,
            problem_title: Some(problem_title),
            difficulty,
            url: url.into(),
            extracted_at: Utc::now(),
            error: None,
        }
    }

    /// The page is not a problem page. Not an error.
    pub fn not_problem(url: impl Into<String>) -> Self {
        Self {
            on_problem: false,
            problem_number: None,
            problem_title: None,
            difficulty: None,
            url: url.into(),
            extracted_at: Utc::now(),
            error: None,
        }
    }

    pub fn soft_failure(url: impl Into<String>, failure: SoftFailure) -> Self {
        Self {
            error: Some(failure.to_string()),
            ..Self::not_problem(url)
        }
    }

    /// Accepted results carry a title; everything else is retryable or terminal.
    pub fn is_accepted(&self) -> bool {
        self.on_problem
            && self
                .problem_title
                .as_deref()
                .is_some_and(|title| !title.trim().is_empty())
    }

    /// Recover the typed failure from the wire `error` string.
    pub fn failure(&self) -> Option<SoftFailure> {
        self.error.as_deref().and_then(SoftFailure::from_message)
    }

    /// Case-insensitive URL identity used for bookmark dedup.
    pub fn same_page(&self, url: &str) -> bool {
        self.url.eq_ignore_ascii_case(url)
    }
}

/// Non-throwing failure outcomes. The display text is the wire `error` value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailure {
    #[error("Invalid title extracted")]
    InvalidTitle,
    #[error("Extraction in progress")]
    InProgress,
    #[error("Failed to extract after retries")]
    Exhausted,
    #[error("Extraction timeout")]
    Timeout,
}

impl SoftFailure {
    const ALL: [SoftFailure; 4] = [
        SoftFailure::InvalidTitle,
        SoftFailure::InProgress,
        SoftFailure::Exhausted,
        SoftFailure::Timeout,
    ];

    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|failure| failure.to_string() == message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a bare difficulty word, ignoring case and surrounding whitespace.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run (including newlines) to one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}
