//! The host document boundary. Everything here is read-only from the
//! engine's point of view.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::fetcher::FetchError;

/// The host document as seen at one instant.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: Url,
    pub html: String,
    pub captured_at: DateTime<Utc>,
}

impl PageSnapshot {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
            captured_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("page unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can hand out the current document.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError>;
}

/// In-memory page whose URL and markup can be swapped, standing in for a
/// single-page app that navigates and renders without reloading.
#[derive(Debug)]
pub struct StaticPage {
    current: RwLock<PageSnapshot>,
}

impl StaticPage {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(PageSnapshot::new(url, html)),
        }
    }

    /// Client-side navigation: new URL and new markup.
    pub fn navigate(&self, url: Url, html: impl Into<String>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) =
            PageSnapshot::new(url, html);
    }

    /// In-place re-render under the same URL.
    pub fn render(&self, html: impl Into<String>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.html = html.into();
        current.captured_at = Utc::now();
    }

    pub fn url(&self) -> Url {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .url
            .clone()
    }
}

#[async_trait]
impl PageSource for StaticPage {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Ok(PageSnapshot {
            captured_at: Utc::now(),
            ..current.clone()
        })
    }
}
