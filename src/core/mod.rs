//! # Core Application Logic
//!
//! This module contains Orbit's business logic. It knows nothing about
//! any specific UI technology: the TUI reads and mutates [`state::App`],
//! and everything here would serve another frontend unchanged.
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`config`]: TOML config file, env vars, CLI resolution
//! - [`readiness`]: The boot gate between splash and home screens
//! - [`cache`]: Offline cache of circles and rosters

pub mod cache;
pub mod config;
pub mod readiness;
pub mod state;
