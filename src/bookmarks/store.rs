use std::fmt;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extractor::ExtractionResult;

/// Opaque key handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("bookmark store unavailable: {0}")]
    Unavailable(String),

    #[error("bookmark list is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Remote list storage keyed by user and list name. Writes replace the
/// whole list; merging and dedup happen before `save`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn load(&self, user: &UserKey, list: &str) -> Result<Vec<ExtractionResult>, StoreError>;

    async fn save(
        &self,
        user: &UserKey,
        list: &str,
        items: Vec<ExtractionResult>,
    ) -> Result<(), StoreError>;
}

/// Process-local store. Lists are kept as JSON documents, the shape a
/// document database would hold them in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<(UserKey, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn load(&self, user: &UserKey, list: &str) -> Result<Vec<ExtractionResult>, StoreError> {
        match self.documents.get(&(user.clone(), list.to_string())) {
            Some(document) => Ok(serde_json::from_str(document.value())?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(
        &self,
        user: &UserKey,
        list: &str,
        items: Vec<ExtractionResult>,
    ) -> Result<(), StoreError> {
        let document = serde_json::to_string(&items)?;
        self.documents.insert((user.clone(), list.to_string()), document);
        Ok(())
    }
}
