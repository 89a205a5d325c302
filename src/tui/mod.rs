//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and feeds keyboard events and backend results into core state.
//!
//! This is the only module that knows about ratatui and crossterm.
//! The intention is to swap this out for a different adapter in the
//! future if needed.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (splash screen): draws every ~80ms for smooth animation.
//! - **Idle** (home screens): sleeps up to 500ms, only redraws on events,
//!   backend results, or terminal resize.
//!
//! On top of that, the memoized panels skip row construction whenever
//! their prop snapshot matches the previous frame, so even a forced
//! redraw after an unchanged refresh reuses cached rows.

mod component;
mod components;
mod event;
pub mod memo;
mod nav;
pub mod props;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use futures::future::join_all;

use crate::backend::{
    Backend, Circle, HorizonBackend, LocalBackend, Member, PresenceUpdate, Profile,
};
use crate::core::cache;
use crate::core::config::ResolvedConfig;
use crate::core::readiness::Readiness;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{CircleListState, MapPanelState, RosterState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::nav::{NavStack, Screen};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    /// Where the user is; the top of the stack is what gets drawn.
    pub nav: NavStack,
    // Persistent component states
    pub circle_list: CircleListState,
    pub roster: RosterState,
    pub map: MapPanelState,
    // Animation state
    pub animation_frame: usize,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            nav: NavStack::new(),
            circle_list: CircleListState::new(),
            roster: RosterState::new(),
            map: MapPanelState::new(),
            animation_frame: 0,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Results flowing back from background backend tasks.
#[derive(Debug)]
enum BackendEvent {
    ProfileLoaded(Profile),
    CirclesLoaded(Vec<Circle>),
    RosterLoaded {
        circle_id: String,
        members: Vec<Member>,
    },
    RefreshDone,
    RefreshFailed(String),
    PresencePublished,
    PublishFailed(String),
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Mouse capture for wheel scrolling; cursor hidden since there is
        // no text input to place it in.
        execute!(stdout(), EnableMouseCapture, Hide)?;
        info!("Terminal modes enabled (mouse capture, hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, Show);
    }
}

/// Build a backend from a resolved config's backend name and credentials.
pub fn build_backend(config: &ResolvedConfig) -> Arc<dyn Backend> {
    match config.backend.as_str() {
        "local" => Arc::new(LocalBackend::new(config.local_seed)),
        _ => {
            // Default to horizon
            let api_key = config.horizon_api_key.clone().expect(
                "Horizon API key must be set (config file, HORIZON_API_KEY env var, or --backend local)",
            );
            let project = config
                .horizon_project
                .clone()
                .expect("Horizon project must be set (config file or HORIZON_PROJECT env var)");
            Arc::new(HorizonBackend::new(
                api_key,
                project,
                config.horizon_base_url.clone(),
            ))
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend = build_backend(&config);
    let mut app = App::new(backend, config.device_name.clone(), config.splash_min);
    if cache::seed_from_cache(&mut app) {
        app.set_status("Showing cached data");
    }
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for results from background backend tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the in-flight refresh
    let mut active_abort_handles = spawn_refresh(app.backend.clone(), false, tx.clone());
    app.is_refreshing = true;

    // Animation timer
    let start_time = Instant::now();
    let mut last_refresh = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Boot gate: leave the splash once the backend has answered and the
        // minimum splash time has elapsed.
        if !app.boot.is_ready() && app.boot.poll(Instant::now()) == Readiness::Ready {
            tui.nav.replace_top(Screen::Circles);
            needs_redraw = true;
        }

        let animating = tui.nav.current() == Screen::Splash;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.animation_frame = (elapsed * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    should_quit = true;
                }
                TuiEvent::Refresh => {
                    if !app.is_refreshing {
                        active_abort_handles =
                            spawn_refresh(app.backend.clone(), app.profile.is_some(), tx.clone());
                        app.is_refreshing = true;
                        app.set_status("Refreshing...");
                        last_refresh = Instant::now();
                    }
                }
                TuiEvent::Publish => {
                    let update = PresenceUpdate {
                        device: app.device_name.clone(),
                        point: None,
                        note: Some("Checked in from terminal".to_string()),
                    };
                    spawn_publish(app.backend.clone(), update, tx.clone());
                    app.set_status("Publishing presence...");
                }
                TuiEvent::NextScreen => {
                    if tui.nav.current() == Screen::Circles {
                        tui.roster.reset_scroll();
                    }
                    tui.nav.cycle();
                }
                TuiEvent::Select => {
                    if tui.nav.current() == Screen::Circles
                        && app.selected_circle < app.circles.len()
                    {
                        // Opening a circle clears its unread badge.
                        app.circles[app.selected_circle].unread = 0;
                        tui.roster.reset_scroll();
                        tui.nav.push(Screen::Roster);
                    }
                }
                TuiEvent::Back => {
                    tui.nav.pop();
                }
                TuiEvent::Up | TuiEvent::Down | TuiEvent::PageUp | TuiEvent::PageDown => {
                    match tui.nav.current() {
                        Screen::Circles => {
                            if !app.circles.is_empty() {
                                match event {
                                    TuiEvent::Up => {
                                        app.selected_circle = app.selected_circle.saturating_sub(1);
                                    }
                                    TuiEvent::Down => {
                                        app.selected_circle =
                                            (app.selected_circle + 1).min(app.circles.len() - 1);
                                    }
                                    _ => {}
                                }
                            }
                        }
                        Screen::Roster => {
                            tui.roster.handle_event(&event);
                        }
                        _ => {}
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle background task results
        while let Ok(event) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", event);
            match event {
                BackendEvent::ProfileLoaded(profile) => {
                    info!("Signed in as @{}", profile.handle);
                    app.profile = Some(profile);
                    app.boot.note_backend_ready();
                }
                BackendEvent::CirclesLoaded(circles) => {
                    app.apply_circles(circles);
                    app.clear_error();
                }
                BackendEvent::RosterLoaded { circle_id, members } => {
                    app.apply_roster(circle_id, members);
                }
                BackendEvent::RefreshDone => {
                    app.is_refreshing = false;
                    app.set_status(format!("Synced {} circles", app.circles.len()));
                    app.boot.note_backend_ready();
                    cache::save_cache(&app);
                }
                BackendEvent::RefreshFailed(message) => {
                    app.is_refreshing = false;
                    app.set_error(message);
                    // A failed first refresh still opens the gate: cached
                    // data plus an error beats a splash that never ends.
                    app.boot.note_backend_ready();
                }
                BackendEvent::PresencePublished => {
                    app.set_status("Checked in");
                    if !app.is_refreshing {
                        active_abort_handles =
                            spawn_refresh(app.backend.clone(), app.profile.is_some(), tx.clone());
                        app.is_refreshing = true;
                        last_refresh = Instant::now();
                    }
                }
                BackendEvent::PublishFailed(message) => {
                    app.set_error(message);
                }
            }
        }

        // Periodic refresh
        if last_refresh.elapsed() >= config.refresh && !app.is_refreshing {
            debug!("Periodic refresh");
            active_abort_handles =
                spawn_refresh(app.backend.clone(), app.profile.is_some(), tx.clone());
            app.is_refreshing = true;
            last_refresh = Instant::now();
        }
    }

    for handle in active_abort_handles.drain(..) {
        handle.abort();
    }

    info!(
        "Render caches on exit: circles {} skipped / {} built, roster {} / {}, map {} / {}",
        tui.circle_list.memo.skips(),
        tui.circle_list.memo.rebuilds(),
        tui.roster.memo.skips(),
        tui.roster.memo.rebuilds(),
        tui.map.memo.skips(),
        tui.map.memo.rebuilds(),
    );

    // Save on exit so the next boot starts populated
    cache::save_cache(&app);

    ratatui::restore();
    Ok(())
}

/// Fetch profile (first run), circles, then every roster concurrently,
/// streaming each result back as it lands.
fn spawn_refresh(
    backend: Arc<dyn Backend>,
    profile_known: bool,
    tx: mpsc::Sender<BackendEvent>,
) -> Vec<tokio::task::AbortHandle> {
    info!("Spawning backend refresh");

    let handle = tokio::spawn(async move {
        if !profile_known {
            match backend.load_profile().await {
                Ok(profile) => {
                    if tx.send(BackendEvent::ProfileLoaded(profile)).is_err() {
                        warn!("Failed to send profile: receiver dropped");
                        return;
                    }
                }
                Err(e) => {
                    info!("Profile load failed: {}", e);
                    let _ = tx.send(BackendEvent::RefreshFailed(e.to_string()));
                    return;
                }
            }
        }

        let circles = match backend.list_circles().await {
            Ok(circles) => circles,
            Err(e) => {
                info!("Circle list failed: {}", e);
                let _ = tx.send(BackendEvent::RefreshFailed(e.to_string()));
                return;
            }
        };
        let circle_ids: Vec<String> = circles.iter().map(|c| c.id.clone()).collect();
        if tx.send(BackendEvent::CirclesLoaded(circles)).is_err() {
            warn!("Failed to send circles: receiver dropped");
            return;
        }

        // All rosters in parallel; one slow circle doesn't hold up the rest.
        let fetches = circle_ids.into_iter().map(|circle_id| {
            let backend = backend.clone();
            async move {
                let result = backend.circle_members(&circle_id).await;
                (circle_id, result)
            }
        });
        for (circle_id, result) in join_all(fetches).await {
            match result {
                Ok(members) => {
                    if tx
                        .send(BackendEvent::RosterLoaded { circle_id, members })
                        .is_err()
                    {
                        warn!("Failed to send roster: receiver dropped");
                        return;
                    }
                }
                Err(e) => {
                    warn!("Roster fetch failed for {}: {}", circle_id, e);
                    let _ = tx.send(BackendEvent::RefreshFailed(e.to_string()));
                    return;
                }
            }
        }

        let _ = tx.send(BackendEvent::RefreshDone);
    });

    vec![handle.abort_handle()]
}

fn spawn_publish(backend: Arc<dyn Backend>, update: PresenceUpdate, tx: mpsc::Sender<BackendEvent>) {
    info!("Spawning presence publish from {}", update.device);
    tokio::spawn(async move {
        match backend.publish_presence(&update).await {
            Ok(()) => {
                if tx.send(BackendEvent::PresencePublished).is_err() {
                    warn!("Failed to send publish result: receiver dropped");
                }
            }
            Err(e) => {
                info!("Publish failed: {}", e);
                let _ = tx.send(BackendEvent::PublishFailed(e.to_string()));
            }
        }
    });
}
