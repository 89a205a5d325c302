//! # Splash Component
//!
//! Boot screen shown while the readiness gate is closed: the orbit
//! animation, the app name, and a status line for the first backend call.
//!

use crate::tui::component::Component;
use crate::tui::components::logo::Logo;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

pub struct Splash {
    frame_index: usize,
    status_line: String,
}

impl Splash {
    pub fn new(frame_index: usize, status_line: String) -> Self {
        Self {
            frame_index,
            status_line,
        }
    }
}

impl Component for Splash {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use ratatui::layout::{Constraint, Flex, Layout};
        use ratatui::style::Modifier;
        use ratatui::text::{Line, Span};

        let mut text_lines = Vec::new();

        text_lines.push(Line::from(Span::styled(
            "Orbit",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));

        text_lines.push(Line::from(Span::styled(
            self.status_line.clone(),
            Style::default().fg(Color::DarkGray),
        )));

        let version_text = format!("v{}", env!("CARGO_PKG_VERSION"));
        text_lines.push(Line::from(Span::styled(
            version_text,
            Style::default().fg(Color::DarkGray),
        )));

        // Ring on top, text below, the whole group centered vertically.
        let canvas_height = Logo::required_height();
        let text_height = text_lines.len() as u16;

        let vertical_layout = Layout::vertical([
            Constraint::Length(canvas_height),
            Constraint::Length(1), // Spacer
            Constraint::Length(text_height),
        ])
        .flex(Flex::Center)
        .split(area);

        Logo::render(frame, vertical_layout[0], self.frame_index);

        let paragraph = Paragraph::new(text_lines).alignment(Alignment::Center);

        frame.render_widget(paragraph, vertical_layout[2]);
    }
}
