pub mod bookmarks;
pub mod config;
pub mod context;
pub mod extractor;
pub mod fetcher;
pub mod messaging;
pub mod monitor;
pub mod page;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use context::PageContext;
pub use extractor::{Difficulty, ExtractionResult, SoftFailure};
pub use messaging::{MessageHandler, Request};
