//! Per-page extraction state shared by the retry controller and the change
//! monitor. All writes go through this type so the "one run at a time" rule
//! lives in one place.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub last_url: String,
    pub is_extracting: bool,
    pub attempts_used: u32,
    run_id: u64,
}

#[derive(Debug, Default)]
pub struct ExtractionSession {
    state: Mutex<SessionState>,
}

impl ExtractionSession {
    pub fn new(initial_url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState {
                last_url: initial_url.into(),
                ..SessionState::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn last_url(&self) -> String {
        self.lock().last_url.clone()
    }

    pub fn is_extracting(&self) -> bool {
        self.lock().is_extracting
    }

    /// Claim the run slot. `None` means another run is in flight.
    ///
    /// The returned guard releases the slot when dropped, so every exit path
    /// of a run (including panics and early returns) gives it back.
    pub fn try_begin_run(self: &Arc<Self>) -> Option<RunGuard> {
        let mut state = self.lock();
        if state.is_extracting {
            return None;
        }
        state.is_extracting = true;
        state.attempts_used = 0;
        state.run_id += 1;
        Some(RunGuard {
            session: Arc::clone(self),
            run_id: state.run_id,
        })
    }

    /// Record a newly observed URL. Returns true when it differs from the
    /// last one, in which case run state has been reset.
    pub fn observe_url(&self, url: &str) -> bool {
        let mut state = self.lock();
        if state.last_url == url {
            return false;
        }
        state.last_url = url.to_string();
        Self::reset_locked(&mut state);
        true
    }

    /// Forget the current run without touching `last_url`.
    pub fn reset(&self) {
        Self::reset_locked(&mut self.lock());
    }

    fn reset_locked(state: &mut SessionState) {
        state.attempts_used = 0;
        state.is_extracting = false;
        // A run orphaned by the reset must not clear flags of a newer one.
        state.run_id += 1;
    }
}

/// Exclusive right to run extraction attempts. Released on drop.
#[derive(Debug)]
pub struct RunGuard {
    session: Arc<ExtractionSession>,
    run_id: u64,
}

impl RunGuard {
    /// Bump the shared attempt counter. Ignored once the run was reset.
    pub fn record_attempt(&self, attempt: u32) {
        let mut state = self.session.lock();
        if state.run_id == self.run_id {
            state.attempts_used = attempt;
        }
    }

    /// False once a navigation reset has orphaned this run.
    pub fn is_current(&self) -> bool {
        self.session.lock().run_id == self.run_id
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut state = self.session.lock();
        if state.run_id == self.run_id {
            state.is_extracting = false;
            state.attempts_used = 0;
        } else {
            debug!(run_id = self.run_id, "orphaned run finished after reset");
        }
    }
}
