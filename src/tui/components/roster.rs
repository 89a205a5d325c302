//! # Roster Component
//!
//! Scrollable member list for the selected circle: presence dot, name,
//! handle, freshness label, and the member's note wrapped underneath.
//!
//! ## Architecture
//!
//! `Roster` is a transient component (created each frame) that wraps
//! `&'a mut RosterState` (persistent scroll state + row cache) and
//! borrowed member data (props).
//!
//! ## Row caching
//!
//! Member rows are objects, so their entries in the prop snapshot are
//! judged by list length alone; the `revision` scalar (bumped by `App`
//! whenever roster contents change) is what actually invalidates the
//! cache, and a `clock` minute bucket keeps freshness labels moving.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::collections::BTreeMap;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::backend::Member;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;
use crate::tui::memo::Memo;
use crate::tui::props::{PropValue, Props};

/// Scroll state and row cache for the roster.
/// Must be persisted in the parent TuiState.
pub struct RosterState {
    pub scroll_state: ScrollViewState,
    pub memo: Memo<Text<'static>>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Total content height from the last build
    pub content_height: u16,
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            memo: Memo::new(),
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Reset to the top, e.g. when a different circle is opened.
    pub fn reset_scroll(&mut self) {
        self.scroll_state.set_offset(Position { x: 0, y: 0 });
    }
}

/// Scroll handling lives on `RosterState` rather than `Roster` because the
/// component is recreated each frame with fresh props and can't hold the
/// persistent offset itself.
impl EventHandler for RosterState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Up => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::Down => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::PageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::PageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
                None
            }
            _ => None,
        }
    }
}

/// Scrollable roster view component.
/// Created fresh each frame with references to state and data.
pub struct Roster<'a> {
    pub state: &'a mut RosterState,
    pub circle_name: &'a str,
    pub circle_id: &'a str,
    pub members: &'a [Member],
    pub revision: u64,
    pub now: DateTime<Utc>,
}

impl<'a> Roster<'a> {
    /// Prop snapshot for the row cache. Member entries are nested maps and
    /// therefore compared by count only; `revision` carries their changes.
    pub fn snapshot(
        circle_id: &str,
        revision: u64,
        members: &[Member],
        width: u16,
        now: DateTime<Utc>,
    ) -> Props {
        let member_rows: Vec<PropValue> = members
            .iter()
            .map(|m| {
                let mut row = BTreeMap::new();
                row.insert("handle".to_string(), PropValue::from(m.handle.as_str()));
                row.insert(
                    "name".to_string(),
                    PropValue::from(m.display_name.as_str()),
                );
                PropValue::from(row)
            })
            .collect();

        Props::new()
            .with("circle", circle_id)
            .with("revision", revision as i64)
            .with("width", width)
            .with("clock", now.timestamp() / 60)
            .with("members", member_rows)
    }

    fn build_rows(members: &[Member], width: u16, now: DateTime<Utc>) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let note_width = width.saturating_sub(4).max(1);

        for member in members {
            let (dot, dot_style) = match &member.presence {
                None => ("·", Style::default().fg(Color::DarkGray)),
                Some(p) if p.is_stale(now) => ("●", Style::default().fg(Color::Yellow)),
                Some(_) => ("●", Style::default().fg(Color::Green)),
            };

            let mut spans = vec![
                Span::styled(dot.to_string(), dot_style),
                Span::styled(
                    format!(" {}", member.display_name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!(" @{}", member.handle),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if let Some(presence) = &member.presence {
                spans.push(Span::styled(
                    format!("  {}", presence.freshness(now)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));

            if let Some(note) = member.presence.as_ref().and_then(|p| p.note.as_deref()) {
                let options = textwrap::Options::new(note_width as usize)
                    .break_words(true)
                    .word_separator(textwrap::WordSeparator::AsciiSpace);
                for wrapped in textwrap::wrap(note, options) {
                    lines.push(Line::from(Span::styled(
                        format!("  {wrapped}"),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }

            lines.push(Line::default());
        }

        Text::from(lines)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.circle_name))
            .title_alignment(Alignment::Left);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.members.is_empty() {
            let empty = Paragraph::new("Nobody here yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }

        let content_width = inner.width.saturating_sub(1); // -1 for scrollbar safe area
        let members = self.members;
        let now = self.now;
        let text = self
            .state
            .memo
            .render_with(
                Self::snapshot(self.circle_id, self.revision, members, content_width, now),
                |_| Self::build_rows(members, content_width, now),
            )
            .clone();

        let total_height = (text.lines.len() as u16).max(1);
        self.state.content_height = total_height;
        self.state.viewport_height = inner.height;
        self.state.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(text),
            Rect::new(0, 0, content_width, total_height),
        );

        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
