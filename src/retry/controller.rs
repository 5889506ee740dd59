use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::extractor::{self, ExtractionResult, SoftFailure};
use crate::page::{PageSnapshot, PageSource};
use crate::retry::RetryPolicy;
use crate::session::ExtractionSession;

/// Terminal state of one controller invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Succeeded,
    Exhausted,
    /// Not a problem page. Terminal on the first attempt.
    NotApplicable,
    /// Another run held the guard; no attempt was made.
    Busy,
    /// A navigation reset orphaned this run; it stopped without answering
    /// for the new page.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub result: ExtractionResult,
    pub attempts: u32,
    pub state: RunState,
}

/// Drives the extractor through a bounded retry loop, one run at a time
/// per session.
pub struct RetryController {
    page: Arc<dyn PageSource>,
    session: Arc<ExtractionSession>,
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(
        page: Arc<dyn PageSource>,
        session: Arc<ExtractionSession>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            page,
            session,
            policy,
        }
    }

    pub fn session(&self) -> &Arc<ExtractionSession> {
        &self.session
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn extract(&self) -> ExtractionResult {
        self.run().await.result
    }

    #[instrument(skip_all, fields(max_attempts = self.policy.max_attempts))]
    pub async fn run(&self) -> RunOutcome {
        let Some(guard) = self.session.try_begin_run() else {
            debug!("extraction already running");
            return RunOutcome {
                result: ExtractionResult::soft_failure(
                    self.session.last_url(),
                    SoftFailure::InProgress,
                ),
                attempts: 0,
                state: RunState::Busy,
            };
        };

        let mut attempt = 1;
        let mut last_url = self.session.last_url();
        loop {
            if !guard.is_current() {
                return self.superseded(attempt - 1);
            }
            guard.record_attempt(attempt);

            let snapshot = self.snapshot(attempt).await;
            if !guard.is_current() {
                return self.superseded(attempt);
            }

            if let Some(result) = snapshot.map(|page| extractor::extract(&page)) {
                last_url.clone_from(&result.url);

                if result.is_accepted() {
                    info!(attempt, url = %result.url, "extraction succeeded");
                    return RunOutcome {
                        result,
                        attempts: attempt,
                        state: RunState::Succeeded,
                    };
                }

                if result.error.is_none() {
                    debug!(attempt, url = %result.url, "not a problem page");
                    return RunOutcome {
                        result,
                        attempts: attempt,
                        state: RunState::NotApplicable,
                    };
                }
            }

            let Some(delay) = self.policy.delay_after(attempt) else {
                warn!(attempts = attempt, url = %last_url, "extraction exhausted retries");
                return RunOutcome {
                    result: ExtractionResult::soft_failure(last_url, SoftFailure::Exhausted),
                    attempts: attempt,
                    state: RunState::Exhausted,
                };
            };

            debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "page not ready, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    fn superseded(&self, attempts: u32) -> RunOutcome {
        debug!(attempts, "run superseded by a reset, stopping");
        RunOutcome {
            result: ExtractionResult::soft_failure(
                self.session.last_url(),
                SoftFailure::InProgress,
            ),
            attempts,
            state: RunState::Superseded,
        }
    }

    /// Current document, or `None` when no snapshot could be taken, which is
    /// retried like any other soft failure.
    async fn snapshot(&self, attempt: u32) -> Option<PageSnapshot> {
        match self.page.snapshot().await {
            Ok(page) => Some(page),
            Err(err) => {
                warn!(attempt, error = %err, "page snapshot failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedPage;
    use std::time::Duration;

    const LRU: &str = r#"<div class="text-title-large"><a href="/problems/lru-cache/">146. LRU Cache</a></div><div class="text-difficulty-medium">Medium</div>"#;
    const ONE_CHAR: &str = r#"<div data-cy="question-title">L</div>"#;

    fn controller(page: Arc<ScriptedPage>) -> RetryController {
        let session = ExtractionSession::new(page.url_string());
        RetryController::new(page, session, RetryPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_first_attempt() {
        let page = ScriptedPage::new("https://leetcode.com/problems/lru-cache/", [LRU]);
        let controller = controller(page.clone());

        let outcome = controller.run().await;

        assert_eq!(outcome.state, RunState::Succeeded);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.result.problem_title.as_deref(), Some("LRU Cache"));
        assert_eq!(page.calls(), 1);
        assert!(!controller.session().is_extracting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_page_renders() {
        let page = ScriptedPage::new(
            "https://leetcode.com/problems/lru-cache/",
            [ONE_CHAR, ONE_CHAR, LRU],
        );
        let controller = controller(page.clone());

        let started = tokio::time::Instant::now();
        let outcome = controller.run().await;

        assert_eq!(outcome.state, RunState::Succeeded);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result.problem_number.as_deref(), Some("146"));
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_three_soft_failures() {
        let page = ScriptedPage::new("https://leetcode.com/problems/l/", [ONE_CHAR]);
        let controller = controller(page.clone());

        let outcome = controller.run().await;

        assert_eq!(outcome.state, RunState::Exhausted);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(page.calls(), 3);
        assert!(!outcome.result.on_problem);
        assert_eq!(
            outcome.result.error.as_deref(),
            Some("Failed to extract after retries")
        );
        assert!(!controller.session().is_extracting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_problem_page_does_not_retry() {
        let page = ScriptedPage::new("https://leetcode.com/explore/featured/", [LRU]);
        let controller = controller(page.clone());

        let outcome = controller.run().await;

        assert_eq!(outcome.state, RunState::NotApplicable);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(page.calls(), 1);
        assert!(!outcome.result.on_problem);
        assert_eq!(outcome.result.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_request_gets_in_progress() {
        let page = ScriptedPage::new("https://leetcode.com/problems/l/", [ONE_CHAR, ONE_CHAR, LRU]);
        let controller = Arc::new(controller(page.clone()));

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.run().await }
        });
        // Let the first run reach its inter-attempt sleep.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = controller.run().await;
        assert_eq!(second.state, RunState::Busy);
        assert_eq!(second.attempts, 0);
        assert_eq!(second.result.failure(), Some(SoftFailure::InProgress));
        assert_eq!(controller.session().state().attempts_used, 1);

        let first = first.await.unwrap();
        assert_eq!(first.state, RunState::Succeeded);
        assert_eq!(first.attempts, 3);
        assert_eq!(page.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_orphaned_run() {
        let page = ScriptedPage::new("https://leetcode.com/problems/l/", [ONE_CHAR]);
        let controller = Arc::new(controller(page.clone()));

        let orphaned = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.run().await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(page.calls(), 1);

        assert!(controller.session().observe_url("https://leetcode.com/problems/lru-cache/"));
        let fresh = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.run().await }
        });

        let orphaned = orphaned.await.unwrap();
        assert_eq!(orphaned.state, RunState::Superseded);
        assert_eq!(orphaned.attempts, 1);
        assert_eq!(orphaned.result.failure(), Some(SoftFailure::InProgress));
        assert_eq!(orphaned.result.url, "https://leetcode.com/problems/lru-cache/");
        // The fresh run still owns the slot after the orphan wakes up.
        assert!(controller.session().is_extracting());

        let fresh = fresh.await.unwrap();
        assert_eq!(fresh.state, RunState::Exhausted);
        assert_eq!(fresh.attempts, 3);
        assert_eq!(page.calls(), 4);
        assert!(!controller.session().is_extracting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_errors_are_retried() {
        let page = ScriptedPage::new("https://leetcode.com/problems/lru-cache/", [LRU]);
        page.fail_next(2);
        let controller = controller(page.clone());

        let outcome = controller.run().await;

        assert_eq!(outcome.state, RunState::Succeeded);
        assert_eq!(outcome.attempts, 3);
    }
}
