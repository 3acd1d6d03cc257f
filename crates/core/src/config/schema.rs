//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[location]`
    #[serde(default)]
    pub location: LocationConfig,

    /// `[storage]`
    #[serde(default)]
    pub storage: StorageConfig,

    /// `[telemetry]`
    #[serde(default)]
    pub telemetry: LoggingConfig,
}

/// Accuracy requested from the positioning backend.
///
/// A best-effort hint; it never changes whether an acquisition succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyHint {
    /// Best fix the device can give
    High,
    /// Coarser, cheaper fix
    #[default]
    Balanced,
}

/// Location acquisition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Maximum age of a cached fix that may be reused
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// Time allowed for a single platform acquisition
    #[serde(default = "default_acquisition_timeout_ms")]
    pub acquisition_timeout_ms: u64,

    /// Accuracy hint used when the caller does not pass one
    #[serde(default)]
    pub default_accuracy: AccuracyHint,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            max_age_ms: default_max_age_ms(),
            acquisition_timeout_ms: default_acquisition_timeout_ms(),
            default_accuracy: AccuracyHint::default(),
        }
    }
}

impl LocationConfig {
    /// Freshness threshold as a duration
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    /// Acquisition timeout as a duration
    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }
}

fn default_max_age_ms() -> u64 {
    5 * 60 * 1000
}

fn default_acquisition_timeout_ms() -> u64 {
    10_000
}

/// Local key-value storage settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Path of the JSON store file; platform data directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Store path with the platform default applied
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".myco"))
                .join("myco")
                .join("store.json")
        })
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
