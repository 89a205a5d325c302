use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseEventKind};

/// TUI-specific input events
pub enum TuiEvent {
    // App-level actions
    Quit,
    Refresh,
    Publish,

    // Navigation
    NextScreen, // Tab cycles Circles → Roster → Map
    Select,     // Enter opens the selected circle's roster
    Back,       // Esc pops one screen

    // Movement within the current screen
    Up,
    Down,
    PageUp,
    PageDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if event::poll(timeout).unwrap() {
        match event::read().unwrap() {
            Event::Key(key_event) => {
                log::debug!(
                    "Key event: {:?} with modifiers {:?}",
                    key_event.code,
                    key_event.modifiers
                );
                match (key_event.modifiers, key_event.code) {
                    (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
                    (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
                    (_, KeyCode::Char('r')) => Some(TuiEvent::Refresh),
                    (_, KeyCode::Char('p')) => Some(TuiEvent::Publish),
                    (_, KeyCode::Tab) => Some(TuiEvent::NextScreen),
                    (_, KeyCode::Enter) => Some(TuiEvent::Select),
                    (_, KeyCode::Esc) => Some(TuiEvent::Back),
                    (_, KeyCode::Up | KeyCode::Char('k')) => Some(TuiEvent::Up),
                    (_, KeyCode::Down | KeyCode::Char('j')) => Some(TuiEvent::Down),
                    (_, KeyCode::PageUp) => Some(TuiEvent::PageUp),
                    (_, KeyCode::PageDown) => Some(TuiEvent::PageDown),
                    _ => None,
                }
            }
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollUp => Some(TuiEvent::Up),
                MouseEventKind::ScrollDown => Some(TuiEvent::Down),
                _ => None,
            },
            Event::Resize(_, _) => Some(TuiEvent::Resize),
            _ => None,
        }
    } else {
        None
    }
}
