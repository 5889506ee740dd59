use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use crate::monitor::source::{ChangeBatch, ChangeSource};

const FEED_CAPACITY: usize = 64;

#[derive(Debug)]
struct FeedState {
    url: RwLock<String>,
    subscriber: Mutex<Option<mpsc::Sender<ChangeBatch>>>,
}

/// Push-based change source: the host forwards mutation batches and URL
/// updates through the paired [`MutationSender`].
#[derive(Debug)]
pub struct MutationFeed {
    state: Arc<FeedState>,
}

/// Host-side handle of a [`MutationFeed`].
#[derive(Debug, Clone)]
pub struct MutationSender {
    state: Arc<FeedState>,
}

impl MutationFeed {
    pub fn new(initial_url: impl Into<String>) -> (Self, MutationSender) {
        let state = Arc::new(FeedState {
            url: RwLock::new(initial_url.into()),
            subscriber: Mutex::new(None),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            MutationSender { state },
        )
    }
}

impl ChangeSource for MutationFeed {
    fn subscribe(&mut self) -> mpsc::Receiver<ChangeBatch> {
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        *self
            .state
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    fn unsubscribe(&mut self) {
        self.state
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn current_url(&self) -> String {
        self.state
            .url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MutationSender {
    /// Record the live URL. Client-side navigation changes it without
    /// reloading; the monitor notices on the next batch.
    pub fn set_url(&self, url: impl Into<String>) {
        *self
            .state
            .url
            .write()
            .unwrap_or_else(PoisonError::into_inner) = url.into();
    }

    /// Deliver a batch. Returns false when nobody is subscribed.
    pub async fn notify(&self, batch: ChangeBatch) -> bool {
        let subscriber = self
            .state
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match subscriber {
            Some(tx) => tx.send(batch).await.is_ok(),
            None => {
                debug!("mutation batch dropped, no subscriber");
                false
            }
        }
    }
}
