use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, info_span};
use url::Url;

use crate::extractor::classifier;
use crate::monitor::source::{ChangeBatch, ChangeSource};
use crate::retry::RetryController;
use crate::session::ExtractionSession;

/// What the monitor did with one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorAction {
    Ignored,
    /// URL changed; run state reset. `prefetch` when the new page is a
    /// problem page.
    Navigated { url: String, prefetch: bool },
    /// Question container re-rendered under the same URL; run state reset.
    Refreshed,
}

/// Keeps the session's page identity current. Never extracts itself; it only
/// resets state and schedules speculative runs on the controller.
pub struct ChangeMonitor<S> {
    source: S,
    session: Arc<ExtractionSession>,
    controller: Arc<RetryController>,
    prefetch_delay: Duration,
    prefetches: TaskTracker,
}

impl<S: ChangeSource> ChangeMonitor<S> {
    pub fn new(source: S, controller: Arc<RetryController>, prefetch_delay: Duration) -> Self {
        Self {
            source,
            session: Arc::clone(controller.session()),
            controller,
            prefetch_delay,
            prefetches: TaskTracker::new(),
        }
    }

    pub fn handle_batch(&self, batch: &ChangeBatch) -> MonitorAction {
        let url = self.source.current_url();
        let on_problem = is_problem_url(&url);

        if self.session.observe_url(&url) {
            info!(url = %url, on_problem, "navigation detected");
            return MonitorAction::Navigated {
                url,
                prefetch: on_problem,
            };
        }

        if on_problem && batch.is_significant() {
            debug!(url = %url, "question container replaced in place");
            self.session.reset();
            return MonitorAction::Refreshed;
        }

        MonitorAction::Ignored
    }

    /// Consume change batches until `shutdown` fires or the source closes.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut changes = self.source.subscribe();
        info!(url = %self.source.current_url(), "change monitor started");

        loop {
            let batch = tokio::select! {
                _ = shutdown.cancelled() => break,
                batch = changes.recv() => batch,
            };

            let Some(batch) = batch else {
                debug!("change source closed");
                break;
            };

            if let MonitorAction::Navigated { prefetch: true, .. } = self.handle_batch(&batch) {
                self.schedule_prefetch(shutdown.child_token());
            }
        }

        self.source.unsubscribe();
        self.prefetches.close();
        self.prefetches.wait().await;
        info!("change monitor stopped");
    }

    fn schedule_prefetch(&self, cancel: CancellationToken) {
        let controller = Arc::clone(&self.controller);
        let delay = self.prefetch_delay;

        self.prefetches.spawn(
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = sleep(delay) => {}
                }
                let outcome = controller.run().await;
                debug!(
                    state = ?outcome.state,
                    attempts = outcome.attempts,
                    "prefetch finished, result discarded"
                );
            }
            .instrument(info_span!("prefetch")),
        );
    }
}

fn is_problem_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => classifier::classify(&parsed).is_problem_page,
        Err(_) => classifier::classify_path(url).is_problem_page,
    }
}
