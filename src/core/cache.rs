//! # Roster Cache
//!
//! Save/load the last known circles and rosters to
//! `~/.orbit/cache/rosters.json`, so a restart shows data immediately
//! instead of a blank home screen while the first refresh runs.
//!
//! The write uses atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. The cache is advisory: any read error falls back to an empty
//! start and the next refresh overwrites the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::backend::{Circle, Member};
use crate::core::state::App;
use std::collections::HashMap;

/// On-disk shape of the cache file.
#[derive(Serialize, Deserialize, Debug)]
pub struct CacheData {
    /// Unix timestamp of the refresh that produced this snapshot.
    pub saved_at: i64,
    pub circles: Vec<Circle>,
    pub rosters: HashMap<String, Vec<Member>>,
}

/// Returns `~/.orbit/cache/`, creating it if needed.
pub fn cache_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".orbit").join("cache");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn cache_path() -> io::Result<PathBuf> {
    Ok(cache_dir()?.join("rosters.json"))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn read_cache_file(path: &Path) -> io::Result<CacheData> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// A snapshot with no circles carries no information worth persisting.
fn should_save(app: &App) -> bool {
    !app.circles.is_empty()
}

/// Save the current circles and rosters to disk. This is the single entry
/// point for cache persistence — call after a successful refresh and on quit.
pub fn save_cache(app: &App) {
    if !should_save(app) {
        return;
    }

    let data = CacheData {
        saved_at: Utc::now().timestamp(),
        circles: app.circles.clone(),
        rosters: app.rosters.clone(),
    };

    let result = cache_path().and_then(|path| atomic_write_json(&path, &data));
    match result {
        Ok(()) => debug!(
            "Cache saved: {} circles, {} rosters",
            data.circles.len(),
            data.rosters.len()
        ),
        Err(e) => warn!("Failed to save cache: {}", e),
    }
}

/// Load the cache from disk, if present.
pub fn load_cache() -> io::Result<Option<CacheData>> {
    let path = cache_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_cache_file(&path).map(Some)
}

/// Populate a freshly booted `App` from the cache. Returns true when
/// anything was loaded. The boot gate is untouched: cached data renders
/// behind the splash, and the gate still waits for the live backend.
pub fn seed_from_cache(app: &mut App) -> bool {
    match load_cache() {
        Ok(Some(data)) => {
            let age_secs = Utc::now().timestamp().saturating_sub(data.saved_at);
            debug!(
                "Cache loaded: {} circles ({}s old)",
                data.circles.len(),
                age_secs
            );
            app.apply_circles(data.circles);
            for (circle_id, members) in data.rosters {
                app.apply_roster(circle_id, members);
            }
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!("Failed to load cache: {}", e);
            false
        }
    }
}
