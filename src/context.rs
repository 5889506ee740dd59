use std::sync::Arc;

use crate::config::Config;
use crate::messaging::MessageHandler;
use crate::monitor::{ChangeMonitor, ChangeSource, UrlPoller};
use crate::page::PageSource;
use crate::retry::RetryController;
use crate::session::ExtractionSession;

/// Everything one loaded page needs: a session, the controller that owns
/// runs against it, and the request handler. Built once per page context.
#[derive(Clone)]
pub struct PageContext {
    pub session: Arc<ExtractionSession>,
    pub controller: Arc<RetryController>,
    pub handler: MessageHandler,
    page: Arc<dyn PageSource>,
    config: Config,
}

impl PageContext {
    pub fn new(page: Arc<dyn PageSource>, initial_url: impl Into<String>, config: Config) -> Self {
        let session = ExtractionSession::new(initial_url);
        let controller = Arc::new(RetryController::new(
            Arc::clone(&page),
            Arc::clone(&session),
            config.retry_policy(),
        ));
        let handler = MessageHandler::new(Arc::clone(&controller), config.request_timeout());

        Self {
            session,
            controller,
            handler,
            page,
            config,
        }
    }

    /// Change monitor over `source`, sharing this context's session.
    pub fn monitor<S: ChangeSource>(&self, source: S) -> ChangeMonitor<S> {
        ChangeMonitor::new(source, Arc::clone(&self.controller), self.config.prefetch_delay())
    }

    /// Polling change source for hosts without a mutation feed. Starts from
    /// the session's current URL so the first poll is not a navigation.
    pub fn url_poller(&self) -> UrlPoller {
        UrlPoller::new(
            Arc::clone(&self.page),
            self.config.poll_interval(),
            self.session.last_url(),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
