//! # Circle List Component
//!
//! Home screen list of joined circles with member counts and unread badges.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `CircleListState` lives in `TuiState`
//! - `CircleList` is created each frame with borrowed state
//!
//! ## Row caching
//!
//! Rows are rebuilt through a [`Memo`]: each frame takes a prop snapshot
//! (names, member counts, unread counts, selection, width — all primitive
//! lists and scalars), and the cached rows are reused whenever the snapshot
//! compares equal to the previous frame's. A periodic refresh that returns
//! the same circles therefore costs no row construction at all.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::backend::Circle;
use crate::tui::memo::Memo;
use crate::tui::props::{PropValue, Props};

/// Persistent state for the circle list.
pub struct CircleListState {
    pub list_state: ListState,
    pub memo: Memo<Vec<ListItem<'static>>>,
}

impl CircleListState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            memo: Memo::new(),
        }
    }
}

impl Default for CircleListState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient render wrapper for the circle list.
pub struct CircleList<'a> {
    state: &'a mut CircleListState,
    circles: &'a [Circle],
    selected: usize,
}

impl<'a> CircleList<'a> {
    pub fn new(state: &'a mut CircleListState, circles: &'a [Circle], selected: usize) -> Self {
        Self {
            state,
            circles,
            selected,
        }
    }

    /// Prop snapshot for the row cache. Everything the rows are built from
    /// must appear here; anything else may go stale unnoticed.
    pub fn snapshot(circles: &[Circle], selected: usize, width: u16) -> Props {
        let names: Vec<PropValue> = circles
            .iter()
            .map(|c| PropValue::from(c.name.as_str()))
            .collect();
        let counts: Vec<PropValue> = circles
            .iter()
            .map(|c| PropValue::from(c.member_count as i64))
            .collect();
        let unreads: Vec<PropValue> = circles
            .iter()
            .map(|c| PropValue::from(c.unread as i64))
            .collect();

        Props::new()
            .with("names", names)
            .with("counts", counts)
            .with("unreads", unreads)
            .with("selected", selected as i64)
            .with("width", width)
    }

    fn build_items(circles: &[Circle], selected: usize, width: u16) -> Vec<ListItem<'static>> {
        let inner_width = width.saturating_sub(4) as usize; // borders + padding

        circles
            .iter()
            .enumerate()
            .map(|(i, circle)| {
                let count_text = format!("{:>3} members", circle.member_count);
                let unread_text = if circle.unread > 0 {
                    format!("  {:>2} new", circle.unread)
                } else {
                    String::new()
                };

                let name_width = inner_width
                    .saturating_sub(count_text.len())
                    .saturating_sub(unread_text.len())
                    .saturating_sub(2);
                let name = truncate_width(&circle.name, name_width);
                let padded_name = format!("{:<width$}", name, width = name_width);

                let style = if i == selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let mut spans = vec![
                    Span::styled(padded_name, style),
                    Span::styled("  ", style),
                    Span::styled(count_text, style),
                ];

                if !unread_text.is_empty() {
                    spans.push(Span::styled(
                        unread_text,
                        if i == selected {
                            style
                        } else {
                            Style::default().fg(Color::Yellow)
                        },
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Circles ")
            .title_alignment(Alignment::Left)
            .padding(Padding::horizontal(1));

        if self.circles.is_empty() {
            let empty = Paragraph::new("No circles yet.\nJoin one from the phone app to see it here")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let circles = self.circles;
        let selected = self.selected;
        let items = self
            .state
            .memo
            .render_with(Self::snapshot(circles, selected, area.width), |_| {
                Self::build_items(circles, selected, area.width)
            })
            .clone();

        self.state.list_state.select(Some(self.selected));
        let list = List::new(items).block(block);

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` display columns, adding
/// "..." if needed. Width-aware so wide glyphs don't overflow the row.
fn truncate_width(s: &str, max_width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}
