//! Page doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::page::{PageError, PageSnapshot, PageSource};

/// Serves a fixed sequence of renders for one URL; the last render repeats.
pub struct ScriptedPage {
    url: Url,
    renders: Mutex<VecDeque<String>>,
    calls: AtomicU32,
    failures: AtomicU32,
    latency: Mutex<Duration>,
}

impl ScriptedPage {
    pub fn new<const N: usize>(url: &str, renders: [&str; N]) -> Arc<Self> {
        Arc::new(Self {
            url: Url::parse(url).unwrap(),
            renders: Mutex::new(renders.iter().map(|html| html.to_string()).collect()),
            calls: AtomicU32::new(0),
            failures: AtomicU32::new(0),
            latency: Mutex::new(Duration::ZERO),
        })
    }

    pub fn url_string(&self) -> String {
        self.url.to_string()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next `count` snapshots fail without consuming a render.
    pub fn fail_next(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Delay every snapshot by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }
}

#[async_trait]
impl PageSource for ScriptedPage {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(PageError::Unavailable("scripted failure".to_string()));
        }

        let html = {
            let mut renders = self.renders.lock().unwrap();
            if renders.len() > 1 {
                renders.pop_front().unwrap_or_default()
            } else {
                renders.front().cloned().unwrap_or_default()
            }
        };
        Ok(PageSnapshot::new(self.url.clone(), html))
    }
}
