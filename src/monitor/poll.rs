use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

use crate::monitor::source::{ChangeBatch, ChangeSource};
use crate::page::PageSource;

/// Change source that periodically samples the page URL and reports an
/// empty batch whenever it moved. For hosts that cannot push mutations.
pub struct UrlPoller {
    page: Arc<dyn PageSource>,
    period: Duration,
    url: Arc<RwLock<String>>,
    stop: Option<CancellationToken>,
}

impl UrlPoller {
    pub fn new(page: Arc<dyn PageSource>, period: Duration, initial_url: impl Into<String>) -> Self {
        Self {
            page,
            period: period.max(Duration::from_millis(1)),
            url: Arc::new(RwLock::new(initial_url.into())),
            stop: None,
        }
    }
}

impl ChangeSource for UrlPoller {
    fn subscribe(&mut self) -> mpsc::Receiver<ChangeBatch> {
        self.unsubscribe();

        let (tx, rx) = mpsc::channel(1);
        let stop = CancellationToken::new();
        self.stop = Some(stop.clone());

        let page = Arc::clone(&self.page);
        let url = Arc::clone(&self.url);
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::spawn(
            async move {
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = tx.closed() => break,
                        _ = ticker.tick() => {}
                    }

                    let live = match page.snapshot().await {
                        Ok(snapshot) => snapshot.url.to_string(),
                        Err(err) => {
                            warn!(error = %err, "url poll failed");
                            continue;
                        }
                    };

                    let moved = {
                        let mut known = url.write().unwrap_or_else(PoisonError::into_inner);
                        if *known == live {
                            false
                        } else {
                            *known = live;
                            true
                        }
                    };

                    if moved && tx.send(ChangeBatch::default()).await.is_err() {
                        break;
                    }
                }
                debug!("url poller stopped");
            }
            .instrument(info_span!("url_poller")),
        );

        rx
    }

    fn unsubscribe(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop.cancel();
        }
    }

    fn current_url(&self) -> String {
        self.url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for UrlPoller {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
