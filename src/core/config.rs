//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.orbit/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OrbitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub horizon: HorizonConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_backend: Option<String>,
    pub device_name: Option<String>,
    pub splash_min_ms: Option<u64>,
    pub refresh_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HorizonConfig {
    pub api_key: Option<String>,
    pub project: Option<String>,
    pub region: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocalConfig {
    pub seed: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SPLASH_MIN_MS: u64 = 1500;
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_DEVICE_NAME: &str = "orbit-terminal";
pub const DEFAULT_HORIZON_REGION: &str = "us-east";

/// Upper bound on the splash delay so a config typo cannot wedge the boot screen.
const MAX_SPLASH_MIN_MS: u64 = 10_000;

/// Lower bound on the refresh interval to keep the hosted backend happy.
const MIN_REFRESH_SECS: u64 = 5;

/// Written to `~/.orbit/config.toml` on first run. Everything is commented
/// out, so the file must stay parseable as an empty `OrbitConfig`.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Orbit Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_backend = "horizon"        # "horizon" or "local"
# device_name = "orbit-terminal"     # Label attached to presence you publish
# splash_min_ms = 1500               # Minimum time the boot screen stays up
# refresh_secs = 30                  # Roster refresh interval

# [horizon]
# api_key = "hz-..."                 # Or set HORIZON_API_KEY env var
# project = "my-circles"             # Or set HORIZON_PROJECT env var
# region = "us-east"                 # "us-east", "eu-west", "ap-south"
# base_url = "https://us-east.horizonbase.com/v1"   # Derived from region if unset

# [local]
# seed = 7                           # Fixture seed for the offline backend
"#;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: String,
    pub device_name: String,
    pub splash_min: Duration,
    pub refresh: Duration,
    pub horizon_api_key: Option<String>,
    pub horizon_project: Option<String>,
    pub horizon_base_url: String,
    pub local_seed: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.orbit/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".orbit").join("config.toml"))
}

/// Load config from `~/.orbit/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `OrbitConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<OrbitConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(OrbitConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(OrbitConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: OrbitConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_backend` is from the CLI flag (None = not specified).
pub fn resolve(config: &OrbitConfig, cli_backend: Option<&str>) -> ResolvedConfig {
    // Backend: CLI → env → config → default
    let backend = cli_backend
        .map(|s| s.to_string())
        .or_else(|| std::env::var("ORBIT_BACKEND").ok())
        .or_else(|| config.general.default_backend.clone())
        .unwrap_or_else(|| "horizon".to_string());

    let device_name = std::env::var("ORBIT_DEVICE_NAME")
        .ok()
        .or_else(|| config.general.device_name.clone())
        .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string());

    // Splash and refresh are clamped so file typos degrade instead of wedging the UI
    let splash_min_ms = config
        .general
        .splash_min_ms
        .unwrap_or(DEFAULT_SPLASH_MIN_MS)
        .min(MAX_SPLASH_MIN_MS);
    let refresh_secs = config
        .general
        .refresh_secs
        .unwrap_or(DEFAULT_REFRESH_SECS)
        .max(MIN_REFRESH_SECS);

    // Horizon API key: env → config
    let horizon_api_key = std::env::var("HORIZON_API_KEY")
        .ok()
        .or_else(|| config.horizon.api_key.clone());

    // Horizon project: env → config
    let horizon_project = std::env::var("HORIZON_PROJECT")
        .ok()
        .or_else(|| config.horizon.project.clone());

    // Horizon base URL: env → config → derived from region
    let region = config
        .horizon
        .region
        .clone()
        .unwrap_or_else(|| DEFAULT_HORIZON_REGION.to_string());
    let horizon_base_url = std::env::var("HORIZON_BASE_URL")
        .ok()
        .or_else(|| config.horizon.base_url.clone())
        .unwrap_or_else(|| format!("https://{region}.horizonbase.com/v1"));

    ResolvedConfig {
        backend,
        device_name,
        splash_min: Duration::from_millis(splash_min_ms),
        refresh: Duration::from_secs(refresh_secs),
        horizon_api_key,
        horizon_project,
        horizon_base_url,
        local_seed: config.local.seed,
    }
}
