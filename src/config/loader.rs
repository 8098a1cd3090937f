//! Configuration loading from TOML files, merged with built-in defaults

use super::defaults;
use crate::core::types::KnownVersion;
use crate::input::Calibration;
use crate::sync::PollIntervals;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_process")]
    pub process: ProcessConfig,

    #[serde(default = "default_poll")]
    pub poll: PollConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    #[serde(default = "default_input")]
    pub input: InputConfig,

    /// Recognized target builds, for identification by executable hash.
    #[serde(default = "default_versions")]
    pub versions: Vec<KnownVersion>,

    /// Entities whose levels are monitored and (optionally) written.
    #[serde(default = "default_entities")]
    pub entities: Vec<EntityConfig>,
}

impl Default for Config {
    fn default() -> Self {
        defaults::default_config()
    }
}

/// Which process to attach to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Executable name to search for, e.g. `Artemis.exe`.
    pub name: String,
    /// Window title to search for instead, when the executable name is
    /// ambiguous. `None` locates by executable name.
    #[serde(default)]
    pub window_title: Option<String>,
}

/// Polling loop sleep intervals, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub attached_ms: u64,
    pub searching_ms: u64,
    pub not_running_ms: u64,
}

impl PollConfig {
    pub fn intervals(&self) -> PollIntervals {
        PollIntervals {
            attached: Duration::from_millis(self.attached_ms),
            searching: Duration::from_millis(self.searching_ms),
            not_running: Duration::from_millis(self.not_running_ms),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Synthesized-input geometry and calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Number of entity columns the target window is divided into.
    pub column_count: usize,
    /// Horizontal pixels reserved across the full window width.
    pub margin_px: f64,
    /// Milliseconds the mouse button is held down per click.
    pub dwell_ms: u64,
    pub slider: SliderConfig,
    pub notch: NotchConfig,
}

/// Geometry of the continuous slider controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderConfig {
    pub x_inset: f64,
    pub bottom: Calibration,
    pub top: Calibration,
}

/// Geometry of the discrete notch controls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotchConfig {
    pub max_notches: u8,
    pub x_scale: f64,
    pub x_inset: f64,
    pub bottom: Calibration,
    pub top: Calibration,
}

/// One monitored entity, occupying one window column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    pub column: usize,
    pub levels: Vec<LevelConfig>,
}

/// One monitored value belonging to an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub kind: ValueKind,
    /// Pointer-chain offsets below the versioned base.
    pub offsets: Vec<i64>,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub write: WriteKind,
}

/// Primitive type of a level's value in target memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Float,
    Byte,
    Int,
}

/// How a level accepts writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteKind {
    /// Read-only.
    #[default]
    None,
    /// Written straight into target memory.
    Direct,
    /// Set by clicking the column's slider control.
    Slider,
    /// Set by clicking the column's notch control.
    Notch,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|_| Config::default())
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    let loader = ConfigLoader::new("config.toml");
    Ok(loader.load_or_default())
}

// Default functions for serde
fn default_process() -> ProcessConfig {
    defaults::default_config().process
}

fn default_poll() -> PollConfig {
    defaults::default_config().poll
}

fn default_logging() -> LoggingConfig {
    defaults::default_config().logging
}

fn default_input() -> InputConfig {
    defaults::default_config().input
}

fn default_versions() -> Vec<KnownVersion> {
    defaults::default_config().versions
}

fn default_entities() -> Vec<EntityConfig> {
    defaults::default_config().entities
}
