use std::sync::Arc;

use tracing::{info, instrument};

use crate::bookmarks::store::{BookmarkStore, StoreError, UserKey};
use crate::extractor::ExtractionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// Only accepted problem extractions can be bookmarked.
    NotAProblem,
}

/// Read-merge-write over a [`BookmarkStore`], with case-insensitive URL
/// dedup.
#[derive(Clone)]
pub struct Bookmarks {
    store: Arc<dyn BookmarkStore>,
}

impl Bookmarks {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user: &UserKey, list: &str) -> Result<Vec<ExtractionResult>, StoreError> {
        self.store.load(user, list).await
    }

    #[instrument(skip_all, fields(user = %user, list, url = %problem.url))]
    pub async fn add(
        &self,
        user: &UserKey,
        list: &str,
        problem: ExtractionResult,
    ) -> Result<AddOutcome, StoreError> {
        if !problem.is_accepted() {
            return Ok(AddOutcome::NotAProblem);
        }

        let mut items = self.store.load(user, list).await?;
        if items.iter().any(|item| item.same_page(&problem.url)) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        items.push(problem);
        self.store.save(user, list, items).await?;
        info!("bookmark added");
        Ok(AddOutcome::Added)
    }

    /// Returns false when nothing matched `url`.
    pub async fn remove(&self, user: &UserKey, list: &str, url: &str) -> Result<bool, StoreError> {
        let items = self.store.load(user, list).await?;
        let before = items.len();
        let kept: Vec<_> = items.into_iter().filter(|item| !item.same_page(url)).collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.store.save(user, list, kept).await?;
        Ok(true)
    }
}
