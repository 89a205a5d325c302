//! # UI Rendering
//!
//! Top-level frame composition: one function per screen, all dispatched
//! from [`draw_ui`] based on the top of the navigation stack.
//!
//! Layout (everything except the splash):
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ status bar            (1 row)│
//! │ active screen          (rest)│
//! │ key hints             (1 row)│
//! └──────────────────────────────┘
//! ```

use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CircleList, MapPanel, Roster, Splash, StatusBar};
use crate::tui::nav::Screen;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let screen = tui.nav.current();

    // The splash owns the whole frame; nothing else is drawn around it.
    if screen == Screen::Splash {
        let mut splash = Splash::new(tui.animation_frame, app.status_message.clone());
        splash.render(frame, frame.area());
        return;
    }

    let [status_area, main_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let mut status_bar = StatusBar::new(
        screen.title().to_string(),
        app.backend.name().to_string(),
        app.status_message.clone(),
        app.is_refreshing,
    );
    status_bar.render(frame, status_area);

    match screen {
        Screen::Circles => {
            let mut list = CircleList::new(&mut tui.circle_list, &app.circles, app.selected_circle);
            list.render(frame, main_area);
        }
        Screen::Roster => draw_roster(frame, main_area, app, tui),
        Screen::Map => draw_map(frame, main_area, app, tui),
        Screen::Splash => {}
    }

    let hints = Paragraph::new(hint_text(screen)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, hint_area);
}

fn draw_roster(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let Some(circle) = app.selected_circle() else {
        render_placeholder(frame, area);
        return;
    };

    let mut roster = Roster {
        state: &mut tui.roster,
        circle_name: &circle.name,
        circle_id: &circle.id,
        members: app.selected_roster(),
        revision: app.roster_revision,
        now: Utc::now(),
    };
    roster.render(frame, area);
}

fn draw_map(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let Some(circle) = app.selected_circle() else {
        render_placeholder(frame, area);
        return;
    };

    let mut map = MapPanel {
        state: &mut tui.map,
        circle_name: &circle.name,
        circle_id: &circle.id,
        members: app.selected_roster(),
        revision: app.roster_revision,
        now: Utc::now(),
    };
    map.render(frame, area);
}

/// Roster and map are only reachable from a selected circle, but the
/// circle list can shrink under them on a refresh.
fn render_placeholder(frame: &mut Frame, area: Rect) {
    let empty = Paragraph::new("No circle selected")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(empty, area);
}

fn hint_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Splash => "",
        Screen::Circles => " ↑/↓ select  Enter open  Tab view  p check in  r refresh  q quit",
        Screen::Roster => " ↑/↓ scroll  Tab view  Esc back  p check in  q quit",
        Screen::Map => " Tab view  Esc back  r refresh  q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Circle;
    use crate::test_support::{test_app, test_member};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app_with_circle() -> App {
        let mut app = test_app();
        app.apply_circles(vec![Circle {
            id: "c1".to_string(),
            name: "Sunday Hikers".to_string(),
            member_count: 2,
            unread: 0,
        }]);
        app.apply_roster(
            "c1".to_string(),
            vec![test_member("wren"), test_member("kofi")],
        );
        app
    }

    #[test]
    fn test_draw_splash_screen() {
        let backend = TestBackend::new(40, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Orbit"));
        assert!(text.contains("Connecting to static..."));
    }

    #[test]
    fn test_draw_circles_screen() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = app_with_circle();
        let mut tui = TuiState::new();
        tui.nav.replace_top(Screen::Circles);

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Circles"));
        assert!(text.contains("Sunday Hikers"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_draw_roster_screen() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = app_with_circle();
        let mut tui = TuiState::new();
        tui.nav.replace_top(Screen::Circles);
        tui.nav.push(Screen::Roster);

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Sunday Hikers"));
        assert!(text.contains("WREN"));
        assert!(text.contains("@kofi"));
    }

    #[test]
    fn test_draw_map_screen() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = app_with_circle();
        let mut tui = TuiState::new();
        tui.nav.replace_top(Screen::Map);

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("(map)"));
    }

    #[test]
    fn test_roster_without_circles_shows_placeholder() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();
        tui.nav.replace_top(Screen::Roster);

        terminal.draw(|f| draw_ui(f, &app, &mut tui)).unwrap();

        assert!(buffer_text(&terminal).contains("No circle selected"));
    }

    #[test]
    fn test_hint_text_mentions_quit_everywhere() {
        for screen in [Screen::Circles, Screen::Roster, Screen::Map] {
            assert!(hint_text(screen).contains("q quit"));
        }
        assert!(hint_text(Screen::Splash).is_empty());
    }
}
