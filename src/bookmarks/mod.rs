//! Bookmark lists: the storage and identity collaborators, seen from the
//! engine side.

pub mod service;
pub mod store;

pub use service::{AddOutcome, Bookmarks};
pub use store::{BookmarkStore, MemoryStore, StoreError, UserKey};
