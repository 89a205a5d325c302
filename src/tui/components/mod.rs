//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `StatusBar`: Top bar showing screen, backend, and sync activity
//! - `Splash`: Boot screen with the orbit animation
//!
//! ### Stateful Components (State + Transient Wrapper)
//!
//! Components that keep persistent state in `TuiState` and are wrapped by
//! a transient struct created each frame:
//! - `CircleList`: Selectable list of circles with a memoized row cache
//! - `Roster`: Scrollable member list with a memoized row cache
//! - `MapPanel`: Position grid with a memoized grid cache
//!
//! ## Design Philosophy
//!
//! ### Co-location of Concerns
//!
//! Each component file contains everything related to that component:
//! - State types
//! - Rendering logic
//! - Prop snapshot construction
//! - Tests
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props", not by reaching into
//! global state. The stateful panels take this one step further: they
//! condense their inputs into a [`Props`](crate::tui::props::Props)
//! snapshot each frame and hand it to a [`Memo`](crate::tui::memo::Memo),
//! which skips rebuilding rows when the snapshot matches the previous
//! frame. A periodic refresh that changes nothing therefore re-renders
//! from cache.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (Top status bar)
//! ├── splash.rs        (Boot screen)
//! ├── logo.rs          (Orbit ring animation)
//! ├── circle_list.rs   (Circle list with unread badges)
//! ├── roster.rs        (Scrollable member roster)
//! └── map_panel.rs     (Position grid)
//! ```

mod status_bar;
pub use status_bar::StatusBar;

pub mod circle_list;
pub mod logo;
pub mod map_panel;
pub mod roster;
pub mod splash;
pub use circle_list::{CircleList, CircleListState};
pub use map_panel::{MapPanel, MapPanelState};
pub use roster::{Roster, RosterState};
pub use splash::Splash;
