//! # Application State
//!
//! Core business state for Orbit. This module contains domain data only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn Backend>     // presence backend
//! ├── profile: Option<Profile>      // own profile, once loaded
//! ├── circles: Vec<Circle>          // joined circles
//! ├── rosters: HashMap              // members keyed by circle ID
//! ├── selected_circle: usize        // index into circles
//! ├── roster_revision: u64          // bumped on roster change
//! ├── status_message: String        // status bar text
//! ├── is_refreshing: bool           // refresh in flight
//! ├── last_error: Option<String>    // error message
//! ├── device_name: String           // reported on publish
//! └── boot: BootGate                // splash → home gate
//! ```
//!
//! The backend is handed in at construction and reached only through this
//! struct. Refresh tasks clone the `Arc`; nothing holds a global handle.

use crate::backend::{Backend, Circle, Member, Profile};
use crate::core::readiness::BootGate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct App {
    pub backend: Arc<dyn Backend>,
    pub profile: Option<Profile>,
    pub circles: Vec<Circle>,
    pub rosters: HashMap<String, Vec<Member>>,
    pub selected_circle: usize,
    /// Bumped whenever any roster's contents actually change. Panels fold
    /// this into their prop snapshots so cached rows go stale with it.
    pub roster_revision: u64,
    pub status_message: String,
    pub is_refreshing: bool,
    pub last_error: Option<String>,
    pub device_name: String,
    pub boot: BootGate,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, device_name: String, min_splash: Duration) -> Self {
        let status_message = format!("Connecting to {}...", backend.name());
        Self {
            backend,
            profile: None,
            circles: Vec::new(),
            rosters: HashMap::new(),
            selected_circle: 0,
            roster_revision: 0,
            status_message,
            is_refreshing: false,
            last_error: None,
            device_name,
            boot: BootGate::new(min_splash, Instant::now()),
        }
    }

    pub fn selected_circle(&self) -> Option<&Circle> {
        self.circles.get(self.selected_circle)
    }

    /// Roster of the selected circle; empty until its first fetch lands.
    pub fn selected_roster(&self) -> &[Member] {
        self.selected_circle()
            .and_then(|c| self.rosters.get(&c.id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replaces the circle list, keeping the selection in bounds and
    /// dropping rosters of circles that no longer exist.
    pub fn apply_circles(&mut self, circles: Vec<Circle>) {
        self.circles = circles;
        if self.selected_circle >= self.circles.len() {
            self.selected_circle = self.circles.len().saturating_sub(1);
        }
        let before = self.rosters.len();
        let keep: Vec<&String> = self.circles.iter().map(|c| &c.id).collect();
        self.rosters.retain(|id, _| keep.contains(&id));
        if self.rosters.len() != before {
            self.roster_revision += 1;
        }
    }

    /// Stores a fetched roster. The revision only moves when the contents
    /// differ, so an unchanged refresh leaves cached panels valid.
    pub fn apply_roster(&mut self, circle_id: String, members: Vec<Member>) {
        let changed = self
            .rosters
            .get(&circle_id)
            .map(|old| old != &members)
            .unwrap_or(true);
        if changed {
            self.rosters.insert(circle_id, members);
            self.roster_revision += 1;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status_message = format!("Error: {message}");
        self.last_error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
