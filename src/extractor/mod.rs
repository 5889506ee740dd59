pub mod classifier;
pub mod difficulty;
pub mod dom;
pub mod model;
pub mod number;
pub mod strategy;
pub mod title;

#[cfg(test)]
mod tests;

pub use classifier::{PageClass, classify};
pub use model::{Difficulty, ExtractionResult, SoftFailure};

use scraper::Html;
use tracing::debug;

use crate::page::PageSnapshot;

/// Shortest title accepted as a real extraction.
pub const MIN_TITLE_CHARS: usize = 2;

/// Derive one structured result from a page snapshot.
///
/// Synchronous and free of side effects besides logging. A problem page
/// whose title cannot be read yet yields the `InvalidTitle` soft failure so
/// the caller can retry once the page has rendered further.
pub fn extract(page: &PageSnapshot) -> ExtractionResult {
    let url = page.url.as_str();

    // 1. Classify from the URL alone
    let class = classifier::classify(&page.url);
    if !class.is_problem_page {
        debug!(url, "not a problem page");
        return ExtractionResult::not_problem(url);
    }

    // 2. Run the field extractors against the live markup
    let document = Html::parse_document(&page.html);
    let title = title::extract_title(&document, class.slug_title.as_deref());
    let number = title
        .number
        .clone()
        .or_else(|| number::extract_number(&document, class.slug_number.as_deref()));
    let difficulty = difficulty::extract_difficulty(&document);

    // 3. Validate before accepting
    match title.title {
        Some(problem_title) if is_valid_title(&problem_title) => {
            debug!(
                url,
                title = %problem_title,
                number = ?number,
                difficulty = ?difficulty,
                title_from_page = title.from_page,
                "extracted problem"
            );
            ExtractionResult::success(url, number, problem_title, difficulty)
        }
        other => {
            debug!(url, title = ?other, "title missing or too short");
            ExtractionResult::soft_failure(url, SoftFailure::InvalidTitle)
        }
    }
}

pub fn is_valid_title(title: &str) -> bool {
    title.trim().chars().count() >= MIN_TITLE_CHARS
}
