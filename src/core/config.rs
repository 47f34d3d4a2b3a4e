//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.dpad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::engine::{DEFAULT_ALIGNMENT_WEIGHT, NavTuning};
use crate::core::history::DEFAULT_EXIT_WINDOW;
use crate::core::registry::AutoFocus;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DpadConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub root_view: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub alignment_weight: Option<f64>,
    pub section_first: Option<bool>,
    pub auto_focus: Option<AutoFocus>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub exit_window_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ROOT_VIEW: &str = "home";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root_view: String,
    pub log_level: LevelFilter,
    pub tuning: NavTuning,
    pub auto_focus: AutoFocus,
    pub exit_window: Duration,
}

/// Values given on the command line (None/false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub root_view: Option<String>,
    pub log_level: Option<String>,
    pub no_auto_focus: bool,
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

/// Returns the path to `~/.dpad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".dpad").join("config.toml"))
}

/// Load config from `~/.dpad/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DpadConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DpadConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DpadConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DpadConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<DpadConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DpadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# dpad Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# root_view = "home"                 # Or set DPAD_ROOT_VIEW
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"

# [navigation]
# alignment_weight = 2.0             # Penalty per unit of perpendicular misalignment
# section_first = true               # Search the focused section before the whole screen
# auto_focus = "first_registration"  # "first_registration" or "disabled"

# [history]
# exit_window_ms = 1000              # Double-back-to-exit window; or DPAD_EXIT_WINDOW_MS
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DpadConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Root view: CLI → env → config → default
    let root_view = cli
        .root_view
        .clone()
        .or_else(|| std::env::var("DPAD_ROOT_VIEW").ok())
        .or_else(|| config.general.root_view.clone())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ROOT_VIEW.to_string());

    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("DPAD_LOG_LEVEL").ok())
        .or_else(|| config.general.log_level.clone())
        .and_then(|s| parse_level(&s))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Exit window: env → config → default
    let exit_window_ms = std::env::var("DPAD_EXIT_WINDOW_MS")
        .ok()
        .and_then(|s| match s.trim().parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("Ignoring DPAD_EXIT_WINDOW_MS={:?}: {}", s, e);
                None
            }
        })
        .or(config.history.exit_window_ms);
    let exit_window = match exit_window_ms {
        Some(0) => {
            warn!("exit_window_ms must be positive, using default");
            DEFAULT_EXIT_WINDOW
        }
        Some(ms) => Duration::from_millis(ms),
        None => DEFAULT_EXIT_WINDOW,
    };

    // Alignment weight: config → default, rejecting nonsense
    let alignment_weight = match config.navigation.alignment_weight {
        Some(w) if w.is_finite() && w >= 0.0 => w,
        Some(w) => {
            warn!("alignment_weight {} is invalid, using default", w);
            DEFAULT_ALIGNMENT_WEIGHT
        }
        None => DEFAULT_ALIGNMENT_WEIGHT,
    };

    // Auto focus: CLI flag wins over config
    let auto_focus = if cli.no_auto_focus {
        AutoFocus::Disabled
    } else {
        config.navigation.auto_focus.unwrap_or_default()
    };

    ResolvedConfig {
        root_view,
        log_level,
        tuning: NavTuning {
            alignment_weight,
            section_first: config.navigation.section_first.unwrap_or(true),
        },
        auto_focus,
        exit_window,
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().parse::<LevelFilter>() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Unknown log level {:?}, using default", s);
            None
        }
    }
}
