use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components in this architecture receive their data as a prop snapshot
/// built fresh each frame:
/// - Panels build a [`Props`](super::props::Props) map from `App` state.
/// - A [`Memo`](super::memo::Memo) compares it against the previous frame's
///   snapshot and reuses the cached artifact when nothing changed.
/// - Internal presentation state (scroll offsets, caches) stays in the
///   component behind `&mut self`.
///
/// # Mutability
///
/// The `render` method takes `&mut self` to allow components to:
/// 1. Update the render cache when the prop comparison misses.
/// 2. Manage presentation state (e.g. scroll offsets) during rendering.
///
/// This aligns with Ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Render the component into the given area.
    ///
    /// Takes `&mut self` to allow updating internal presentation state
    /// or caches during the render pass.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
