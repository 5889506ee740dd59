//! Request/response surface exposed to the rest of the extension.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{Instrument, debug, info_span, instrument, warn};

use crate::extractor::{ExtractionResult, SoftFailure};
use crate::retry::RetryController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetProblemInfo,
}

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("could not encode response: {0}")]
    Encode(serde_json::Error),
}

/// Answers `getProblemInfo` with exactly one [`ExtractionResult`], bounded by
/// a timeout.
#[derive(Clone)]
pub struct MessageHandler {
    controller: Arc<RetryController>,
    timeout: Duration,
}

impl MessageHandler {
    pub fn new(controller: Arc<RetryController>, timeout: Duration) -> Self {
        Self {
            controller,
            timeout,
        }
    }

    pub async fn handle(&self, request: Request) -> ExtractionResult {
        match request {
            Request::GetProblemInfo => self.problem_info().await,
        }
    }

    /// JSON in, JSON out. Only an unparseable request is an error; every
    /// parsed request gets a response.
    pub async fn handle_json(&self, raw: &str) -> Result<String, MessageError> {
        let request: Request = serde_json::from_str(raw)?;
        let response = self.handle(request).await;
        serde_json::to_string(&response).map_err(MessageError::Encode)
    }

    /// Race the extraction pipeline against the timeout over a one-shot
    /// completion signal. The pipeline runs as its own task, so a timeout only
    /// stops the waiting: the run still finishes and releases its guard, and
    /// its late result is dropped with the closed channel.
    #[instrument(skip_all, fields(timeout_ms = self.timeout.as_millis() as u64))]
    async fn problem_info(&self) -> ExtractionResult {
        let (done_tx, done_rx) = oneshot::channel();
        let controller = Arc::clone(&self.controller);

        tokio::spawn(
            async move {
                let result = controller.extract().await;
                if done_tx.send(result).is_err() {
                    debug!("late extraction result discarded");
                }
            }
            .instrument(info_span!("pipeline")),
        );

        tokio::select! {
            finished = done_rx => {
                match finished {
                    Ok(result) => result,
                    // Pipeline task died without answering; still answer once.
                    Err(_) => {
                        warn!("extraction pipeline dropped without a result");
                        ExtractionResult::soft_failure(
                            self.controller.session().last_url(),
                            SoftFailure::Exhausted,
                        )
                    }
                }
            }
            _ = sleep(self.timeout) => {
                warn!("extraction timed out");
                ExtractionResult::soft_failure(
                    self.controller.session().last_url(),
                    SoftFailure::Timeout,
                )
            }
        }
    }
}
