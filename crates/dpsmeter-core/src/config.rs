//! Configuration for combat tracking and display formatting

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Number formatting for damage and DPS figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Magnitude at which the suffix form kicks in
    pub thousand_threshold: f64,
    /// Decimal places for suffixed and DPS values
    pub decimals: usize,
    /// Suffix appended to scaled values
    pub suffix: String,
}

impl FormatConfig {
    pub fn new() -> Self {
        Self {
            thousand_threshold: 1000.0,
            decimals: 1,
            suffix: "k".to_string(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Meter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Silence (seconds) after which the player is considered out of combat
    pub combat_pause_threshold_secs: f64,

    /// Inactivity (seconds) above which a gap is excluded from active time
    pub gap_threshold_secs: f64,

    /// Max archived combat sessions
    pub max_combat_sessions: usize,

    /// Parse-and-update tick interval
    pub update_interval_ms: u64,

    /// Latest-file discovery interval
    pub file_check_interval_ms: u64,

    /// Extension of combat log files (without the dot)
    pub log_extension: String,

    pub formatting: FormatConfig,
}

impl Config {
    pub fn new() -> Self {
        Self {
            combat_pause_threshold_secs: 8.0,
            gap_threshold_secs: 10.0,
            max_combat_sessions: 10,
            update_interval_ms: 200,
            file_check_interval_ms: 10_000,
            log_extension: "txt".to_string(),
            formatting: FormatConfig::new(),
        }
    }

    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&contents).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
