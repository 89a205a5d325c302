//! Boot readiness gate.
//!
//! The app boots in `NotReady` and shows the splash screen until two
//! conditions hold: the backend has answered its first profile request,
//! and the minimum splash duration has elapsed. The transition is taken
//! once; `Ready` is absorbing.

use std::time::{Duration, Instant};

/// Boot phase of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Still booting: splash screen is up, backend may not have answered.
    NotReady,
    /// Boot complete: the home screen is live.
    Ready,
}

/// State machine guarding the splash → home transition.
///
/// `poll` is the only transition function. It moves `NotReady → Ready`
/// when both arms of the guard hold, and does nothing afterwards.
#[derive(Debug)]
pub struct BootGate {
    state: Readiness,
    started_at: Instant,
    min_splash: Duration,
    backend_ready: bool,
}

impl BootGate {
    /// `now` is passed in rather than sampled so tests can drive the
    /// clock explicitly.
    pub fn new(min_splash: Duration, now: Instant) -> Self {
        Self {
            state: Readiness::NotReady,
            started_at: now,
            min_splash,
            backend_ready: false,
        }
    }

    /// Records that the backend answered its first request. Arms one half
    /// of the guard; the transition itself happens in `poll`.
    pub fn note_backend_ready(&mut self) {
        self.backend_ready = true;
    }

    /// Advances the machine and returns the current state.
    pub fn poll(&mut self, now: Instant) -> Readiness {
        if self.state == Readiness::NotReady
            && self.backend_ready
            && now.duration_since(self.started_at) >= self.min_splash
        {
            self.state = Readiness::Ready;
            log::debug!(
                "Boot gate opened after {:?}",
                now.duration_since(self.started_at)
            );
        }
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == Readiness::Ready
    }
}
