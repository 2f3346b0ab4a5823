//! Configuration loading and data source resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every field has a
//! built-in default, so a missing file is not an error: the chart starts with
//! defaults and a warning is logged. A file that exists but does not parse is
//! reported to the caller.
//!
//! # Resolution Priority
//!
//! Config file:
//! 1. Explicit path passed by the embedder (highest priority)
//! 2. `DTC_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/dtc/config.toml`)
//! 4. Built-in defaults (fallback)
//!
//! Data source:
//! 1. `DTC_DATA_SOURCE` environment variable
//! 2. `data_source` key of the loaded TOML config

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "DTC_CONFIG";

/// Environment variable overriding the catalog location
pub const DATA_SOURCE_ENV_VAR: &str = "DTC_DATA_SOURCE";

/// Default catalog location, relative to the working directory
pub const DEFAULT_DATA_SOURCE: &str = "data.json";

/// Gap after which a new tap starts a fresh session
pub const DEFAULT_TAP_COOLDOWN_MS: u64 = 3000;

/// Number of most-recent taps kept for the estimate
pub const DEFAULT_TAP_HISTORY: usize = 15;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Catalog location (filesystem path or http(s) URL)
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Tap tempo tuning
    #[serde(default)]
    pub tap: TapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            tap: TapConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Tap tempo configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Milliseconds between taps after which the session restarts
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Maximum number of taps retained (oldest evicted first)
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_TAP_COOLDOWN_MS,
            max_events: DEFAULT_TAP_HISTORY,
        }
    }
}

impl TapConfig {
    /// Reject settings that would make an estimate impossible
    pub fn validate(&self) -> Result<()> {
        if self.max_events < 2 {
            return Err(Error::Config(format!(
                "tap.max_events must be at least 2 (got {})",
                self.max_events
            )));
        }
        if self.cooldown_ms == 0 {
            return Err(Error::Config("tap.cooldown_ms must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Cooldown as a Duration
    pub fn cooldown(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cooldown_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_TAP_COOLDOWN_MS
}

fn default_max_events() -> usize {
    DEFAULT_TAP_HISTORY
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the dance catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local JSON file
    Path(PathBuf),
    /// Remote JSON document fetched over HTTP(S)
    Url(String),
}

impl DataSource {
    /// Classify a configured location
    ///
    /// `http://` and `https://` prefixes select [`DataSource::Url`];
    /// everything else is treated as a filesystem path.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::InvalidInput("data source is empty".to_string()));
        }

        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Url(value.to_string()))
        } else {
            Ok(DataSource::Path(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Locate the config file following the resolution priority
///
/// Returns `None` when no candidate exists; callers fall back to defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: explicit path
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: platform config directory
    let user_config = dirs::config_dir().map(|d| d.join("dtc").join("config.toml"));
    match user_config {
        Some(path) if path.exists() => Some(path),
        _ => None,
    }
}

/// Load and validate a config file
///
/// A missing file yields defaults (with a warning). Parse or validation
/// failures are returned as errors.
pub fn load_config(path: &Path) -> Result<TomlConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Config file not found at {}, using built-in defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let config: TomlConfig = toml::from_str(&content)?;
    config.tap.validate()?;

    info!("Loaded config from {}", path.display());
    debug!(?config, "Effective configuration");
    Ok(config)
}

/// Resolve and load configuration in one step
pub fn load_resolved_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(explicit) {
        Some(path) => load_config(&path),
        None => {
            info!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve the catalog location: environment override, then config value
pub fn resolve_data_source(config: &TomlConfig) -> Result<DataSource> {
    if let Ok(value) = std::env::var(DATA_SOURCE_ENV_VAR) {
        if !value.trim().is_empty() {
            debug!("Data source overridden by {}", DATA_SOURCE_ENV_VAR);
            return DataSource::parse(&value);
        }
    }

    DataSource::parse(&config.data_source)
}
