//! Animated orbit ring shown on the splash screen.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

/// One satellite circling a ring. Each frame moves the satellite one
/// station clockwise; all lines are padded to equal width so centered
/// alignment doesn't wobble between frames.
const FRAMES: [[&str; 7]; 4] = [
    [
        "     · ● ·     ",
        "  ·         ·  ",
        " ·           · ",
        " ·     ○     · ",
        " ·           · ",
        "  ·         ·  ",
        "     · · ·     ",
    ],
    [
        "     · · ·     ",
        "  ·         ·  ",
        " ·           · ",
        " ·     ○     ● ",
        " ·           · ",
        "  ·         ·  ",
        "     · · ·     ",
    ],
    [
        "     · · ·     ",
        "  ·         ·  ",
        " ·           · ",
        " ·     ○     · ",
        " ·           · ",
        "  ·         ·  ",
        "     · ● ·     ",
    ],
    [
        "     · · ·     ",
        "  ·         ·  ",
        " ·           · ",
        " ●     ○     · ",
        " ·           · ",
        "  ·         ·  ",
        "     · · ·     ",
    ],
];

pub struct Logo;

impl Logo {
    pub fn required_height() -> u16 {
        FRAMES[0].len() as u16
    }

    /// Render one animation frame, vertically centered in `area`.
    pub fn render(frame: &mut Frame, area: Rect, frame_index: usize) {
        let art = &FRAMES[frame_index % FRAMES.len()];
        let height = art.len() as u16;

        let y = area.y + area.height.saturating_sub(height) / 2;
        let target = Rect::new(area.x, y, area.width, height.min(area.height));

        let lines: Vec<Line> = art.iter().map(|row| Line::from(*row)).collect();
        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, target);
    }
}
