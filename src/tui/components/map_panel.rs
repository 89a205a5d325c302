//! # Map Panel Component
//!
//! Plots the selected circle's members on a character grid. Positions are
//! projected from the bounding box of all shared points, so the view
//! always frames the whole circle; each member is drawn as the first
//! letter of their handle, colored by presence freshness.
//!
//! The grid is cached behind a [`Memo`] keyed on the projected coordinates
//! (float lists), the handles, the grid size, and the roster revision.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::backend::{GeoBounds, GeoPoint, Member};
use crate::tui::memo::Memo;
use crate::tui::props::{PropValue, Props};

/// Row cache for the map grid.
pub struct MapPanelState {
    pub memo: Memo<Text<'static>>,
}

impl Default for MapPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapPanelState {
    pub fn new() -> Self {
        Self { memo: Memo::new() }
    }
}

/// Transient render wrapper for the map panel.
pub struct MapPanel<'a> {
    pub state: &'a mut MapPanelState,
    pub circle_name: &'a str,
    pub circle_id: &'a str,
    pub members: &'a [Member],
    pub revision: u64,
    pub now: DateTime<Utc>,
}

/// A member with a shared position, ready to plot.
struct Plot<'a> {
    point: GeoPoint,
    marker: char,
    handle: &'a str,
    stale: bool,
}

impl<'a> MapPanel<'a> {
    fn plots<'m>(members: &'m [Member], now: DateTime<Utc>) -> Vec<Plot<'m>> {
        members
            .iter()
            .filter_map(|m| {
                let presence = m.presence.as_ref()?;
                let point = presence.point?;
                let marker = m
                    .handle
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('?');
                Some(Plot {
                    point,
                    marker,
                    handle: &m.handle,
                    stale: presence.is_stale(now),
                })
            })
            .collect()
    }

    /// Prop snapshot for the grid cache. Coordinates go in as float lists
    /// so any movement rebuilds; handles catch join/leave renames.
    pub fn snapshot(
        circle_id: &str,
        revision: u64,
        members: &[Member],
        width: u16,
        height: u16,
        now: DateTime<Utc>,
    ) -> Props {
        let plots = Self::plots(members, now);
        let xs: Vec<PropValue> = plots.iter().map(|p| PropValue::from(p.point.lon)).collect();
        let ys: Vec<PropValue> = plots.iter().map(|p| PropValue::from(p.point.lat)).collect();
        let handles: Vec<PropValue> = plots.iter().map(|p| PropValue::from(p.handle)).collect();

        Props::new()
            .with("circle", circle_id)
            .with("revision", revision as i64)
            .with("width", width)
            .with("height", height)
            .with("clock", now.timestamp() / 60)
            .with("xs", xs)
            .with("ys", ys)
            .with("handles", handles)
    }

    fn build_grid(members: &[Member], width: u16, height: u16, now: DateTime<Utc>) -> Text<'static> {
        let plots = Self::plots(members, now);
        if width == 0 {
            return Text::default();
        }
        let (width, height) = (width as usize, height.max(1) as usize);

        let bounds = match GeoBounds::around(plots.iter().map(|p| p.point)) {
            Some(b) => {
                let span = (b.max_lat - b.min_lat).max(b.max_lon - b.min_lon);
                b.padded((span * 0.05).max(0.001))
            }
            None => return Text::default(),
        };

        let mut grid: Vec<Vec<Option<(char, Style)>>> = vec![vec![None; width]; height];
        for plot in &plots {
            let (x, y) = bounds.project(plot.point);
            let col = (x * (width.saturating_sub(1)) as f64).round() as usize;
            let row = ((1.0 - y) * (height.saturating_sub(1)) as f64).round() as usize;
            let style = if plot.stale {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            // Later members overwrite earlier ones on a shared cell.
            grid[row.min(height - 1)][col.min(width - 1)] = Some((plot.marker, style));
        }

        let lines: Vec<Line<'static>> = grid
            .into_iter()
            .map(|row| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut gap = String::new();
                for cell in row {
                    match cell {
                        None => gap.push(' '),
                        Some((marker, style)) => {
                            if !gap.is_empty() {
                                spans.push(Span::raw(std::mem::take(&mut gap)));
                            }
                            spans.push(Span::styled(marker.to_string(), style));
                        }
                    }
                }
                if !gap.is_empty() {
                    spans.push(Span::raw(gap));
                }
                Line::from(spans)
            })
            .collect();

        Text::from(lines)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} (map) ", self.circle_name))
            .title_alignment(Alignment::Left);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if Self::plots(self.members, self.now).is_empty() {
            let empty = Paragraph::new("No positions shared yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
            return;
        }

        let members = self.members;
        let now = self.now;
        let grid = self
            .state
            .memo
            .render_with(
                Self::snapshot(
                    self.circle_id,
                    self.revision,
                    members,
                    inner.width,
                    inner.height,
                    now,
                ),
                |_| Self::build_grid(members, inner.width, inner.height, now),
            )
            .clone();

        frame.render_widget(Paragraph::new(grid), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Presence;
    use chrono::TimeZone;

    fn fixture_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn located_member(handle: &str, lat: f64, lon: f64) -> Member {
        Member {
            id: format!("id-{handle}"),
            handle: handle.to_string(),
            display_name: handle.to_uppercase(),
            presence: Some(Presence {
                point: Some(GeoPoint { lat, lon }),
                noted_at: fixture_now(),
                note: None,
            }),
        }
    }

    fn marker_position(text: &Text, marker: char) -> Option<(usize, usize)> {
        text.lines.iter().enumerate().find_map(|(row, line)| {
            line.to_string().find(marker).map(|col| (row, col))
        })
    }

    #[test]
    fn test_markers_keep_compass_orientation() {
        // wren is north-east of kofi, so on screen: higher and to the right.
        let members = vec![
            located_member("wren", 39.0, -8.0),
            located_member("kofi", 38.0, -9.0),
        ];
        let grid = MapPanel::build_grid(&members, 21, 11, fixture_now());

        let (wren_row, wren_col) = marker_position(&grid, 'W').unwrap();
        let (kofi_row, kofi_col) = marker_position(&grid, 'K').unwrap();
        assert!(wren_row < kofi_row);
        assert!(wren_col > kofi_col);
    }

    #[test]
    fn test_single_point_lands_mid_grid() {
        let members = vec![located_member("wren", 38.722, -9.139)];
        let grid = MapPanel::build_grid(&members, 21, 11, fixture_now());

        let (row, col) = marker_position(&grid, 'W').unwrap();
        assert_eq!(row, 5);
        assert_eq!(col, 10);
    }

    #[test]
    fn test_members_without_points_are_not_plotted() {
        let members = vec![Member {
            id: "id-juno".to_string(),
            handle: "juno".to_string(),
            display_name: "Juno".to_string(),
            presence: None,
        }];
        let grid = MapPanel::build_grid(&members, 21, 11, fixture_now());
        assert!(grid.lines.is_empty());
    }

    #[test]
    fn test_unchanged_positions_reuse_grid() {
        let mut state = MapPanelState::new();
        let now = fixture_now();
        let members = vec![located_member("wren", 39.0, -8.0)];
        let again = vec![located_member("wren", 39.0, -8.0)];

        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &members, 21, 11, now), |_| {
                MapPanel::build_grid(&members, 21, 11, now)
            });
        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &again, 21, 11, now), |_| {
                MapPanel::build_grid(&again, 21, 11, now)
            });

        assert_eq!(state.memo.skips(), 1);
    }

    #[test]
    fn test_movement_rebuilds_grid() {
        let mut state = MapPanelState::new();
        let now = fixture_now();
        let before = vec![located_member("wren", 39.0, -8.0)];
        let after = vec![located_member("wren", 39.2, -8.0)];

        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &before, 21, 11, now), |_| {
                MapPanel::build_grid(&before, 21, 11, now)
            });
        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &after, 21, 11, now), |_| {
                MapPanel::build_grid(&after, 21, 11, now)
            });

        assert_eq!(state.memo.rebuilds(), 2);
    }

    #[test]
    fn test_resize_rebuilds_grid() {
        let mut state = MapPanelState::new();
        let now = fixture_now();
        let members = vec![located_member("wren", 39.0, -8.0)];

        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &members, 21, 11, now), |_| {
                MapPanel::build_grid(&members, 21, 11, now)
            });
        state
            .memo
            .render_with(MapPanel::snapshot("c1", 3, &members, 40, 11, now), |_| {
                MapPanel::build_grid(&members, 40, 11, now)
            });

        assert_eq!(state.memo.rebuilds(), 2);
    }
}
