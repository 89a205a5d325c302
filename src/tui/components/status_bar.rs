//! # StatusBar Component
//!
//! Top status bar showing where the user is and what the app is doing.
//!
//! ## Responsibilities
//!
//! - Display the current screen and backend name
//! - Display status messages (e.g., "Connecting to horizon...", errors)
//! - Show a "⟳ syncing" indicator while a refresh is in flight
//!
//! StatusBar is purely presentational: it receives all data as props and
//! has no internal state, so rendering it twice with the same props gives
//! the same line.
//!
//! ## Conditional Formatting
//!
//! The title text changes based on state:
//!
//! 1. **Refreshing**: `"Orbit Roster (backend: horizon) | Synced 30s ago | ⟳ syncing"`
//! 2. **Status message**: `"Orbit Circles (backend: horizon) | Synced 30s ago"`
//! 3. **Default**: `"Orbit Circles (backend: horizon)"`
//!
//! This priority order keeps the most important information visible even
//! on narrow terminals.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar component showing screen, backend, and sync activity.
pub struct StatusBar {
    /// Title of the screen being shown (e.g., "Circles")
    pub screen_title: String,
    /// Name of the connected backend (e.g., "horizon")
    pub backend_name: String,
    /// Transient status (e.g., "Connecting...", "Error: ...")
    pub status_message: String,
    /// Whether a refresh is currently in flight
    pub is_refreshing: bool,
}

impl StatusBar {
    pub fn new(
        screen_title: String,
        backend_name: String,
        status_message: String,
        is_refreshing: bool,
    ) -> Self {
        Self {
            screen_title,
            backend_name,
            status_message,
            is_refreshing,
        }
    }
}

impl Component for StatusBar {
    /// Render the status bar as a single line with conditional formatting.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.is_refreshing {
            format!(
                "Orbit {} (backend: {}) | {} | ⟳ syncing",
                self.screen_title, self.backend_name, self.status_message
            )
        } else if self.status_message.is_empty() {
            format!(
                "Orbit {} (backend: {})",
                self.screen_title, self.backend_name
            )
        } else {
            format!(
                "Orbit {} (backend: {}) | {}",
                self.screen_title, self.backend_name, self.status_message
            )
        };

        frame.render_widget(Span::raw(title_text), area);
    }
}
