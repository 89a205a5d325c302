//! # Render Memoization
//!
//! [`Memo`] wraps one panel's render artifact (usually a [`ratatui::text::Text`])
//! together with the prop snapshot that produced it. Each frame the panel
//! rebuilds its snapshot and calls [`Memo::render_with`]; when the gate in
//! `props` judges the snapshot unchanged, the cached artifact is returned
//! and the build closure never runs.
//!
//! A panel can install its own comparator, which then fully replaces the
//! default gate. Comparator panics are absorbed and treated as "changed",
//! so a bad comparator costs a rebuild, never a crash.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use log::warn;

use super::props::{Props, props_equal};

/// Caller-supplied replacement for the default snapshot gate.
pub type Comparator = Rc<dyn Fn(&Props, &Props) -> bool>;

/// Per-panel cache of the last accepted snapshot and its render artifact.
pub struct Memo<T> {
    last_props: Option<Props>,
    cached: Option<T>,
    comparator: Option<Comparator>,
    skips: u64,
    rebuilds: u64,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            last_props: None,
            cached: None,
            comparator: None,
            skips: 0,
            rebuilds: 0,
        }
    }

    /// A memo whose equality decision is made entirely by `comparator`;
    /// the default gate never runs.
    pub fn with_comparator(comparator: Comparator) -> Self {
        Self {
            comparator: Some(comparator),
            ..Self::new()
        }
    }

    /// Returns the cached artifact when `next` is judged equal to the last
    /// accepted snapshot, otherwise rebuilds via `build`. Either way `next`
    /// becomes the snapshot future frames compare against.
    pub fn render_with(&mut self, next: Props, build: impl FnOnce(&Props) -> T) -> &T {
        let reuse = self.cached.is_some() && self.judge(&next);
        if reuse {
            self.skips += 1;
        } else {
            self.cached = Some(build(&next));
            self.rebuilds += 1;
        }
        self.last_props = Some(next);
        match &self.cached {
            Some(artifact) => artifact,
            // The rebuild branch above filled the cache
            None => unreachable!("memo cache populated on miss"),
        }
    }

    /// Drops the cached artifact so the next frame rebuilds no matter what
    /// the snapshot says. Used when something outside the props changed
    /// (terminal palette, forced refresh).
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.last_props = None;
    }

    /// Frames that reused the cached artifact.
    pub fn skips(&self) -> u64 {
        self.skips
    }

    /// Frames that ran the build closure.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn judge(&self, next: &Props) -> bool {
        match &self.comparator {
            Some(comparator) => {
                let Some(prev) = self.last_props.as_ref() else {
                    return false;
                };
                run_comparator(comparator, prev, next)
            }
            None => props_equal(self.last_props.as_ref(), Some(next)),
        }
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a custom comparator, absorbing panics into a "changed" verdict.
fn run_comparator(comparator: &Comparator, prev: &Props, next: &Props) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| comparator(prev, next))) {
        Ok(equal) => equal,
        Err(_) => {
            warn!("Custom prop comparator panicked, forcing rebuild");
            false
        }
    }
}
