//! TOML-based configuration for the agent.
//!
//! Reads and writes [`AgentConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\gazelink\config.toml`
//! - Linux:    `~/.config/gazelink/config.toml`
//! - macOS:    `~/Library/Application Support/gazelink/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [agent]
//! log_level = "debug"
//!
//! [serial]
//! port = "COM8"
//! baud_rate = 9600
//!
//! [video]
//! device_index = 1
//! dictionary = "6x6_100"
//!
//! [pointer]
//! serial_speed_ms = 150
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a file only needs the
//! values that differ from the defaults, and a missing file means "all
//! defaults".

use std::path::{Path, PathBuf};
use std::time::Duration;

use gazelink_core::{MarkerDictionary, ScreenSize, SpeedTiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent: GeneralConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Port connected at startup when `--port` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Sleep between two polls of the port.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Video channel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoConfig {
    /// Camera index used when `--camera` is given without a value.
    #[serde(default)]
    pub device_index: u32,
    #[serde(default = "default_screen_width")]
    pub frame_width: u32,
    #[serde(default = "default_screen_height")]
    pub frame_height: u32,
    /// Pause after each processed frame.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default)]
    pub dictionary: MarkerDictionary,
}

/// Glide durations and the virtual screen used by `--headless`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointerConfig {
    #[serde(default = "default_speed_ms")]
    pub default_speed_ms: u64,
    #[serde(default = "default_serial_speed_ms")]
    pub serial_speed_ms: u64,
    #[serde(default = "default_random_speed_ms")]
    pub random_speed_ms: u64,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_baud_rate() -> u32 {
    9600
}
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_frame_interval_ms() -> u64 {
    50
}
fn default_speed_ms() -> u64 {
    700
}
fn default_serial_speed_ms() -> u64 {
    200
}
fn default_random_speed_ms() -> u64 {
    120
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            frame_width: default_screen_width(),
            frame_height: default_screen_height(),
            frame_interval_ms: default_frame_interval_ms(),
            dictionary: MarkerDictionary::default(),
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            default_speed_ms: default_speed_ms(),
            serial_speed_ms: default_serial_speed_ms(),
            random_speed_ms: default_random_speed_ms(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl SerialConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl VideoConfig {
    pub fn resolution(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl PointerConfig {
    pub fn speed_tiers(&self) -> SpeedTiers {
        SpeedTiers {
            interactive: Duration::from_millis(self.default_speed_ms),
            serial: Duration::from_millis(self.serial_speed_ms),
            random: Duration::from_millis(self.random_speed_ms),
        }
    }

    pub fn virtual_screen(&self) -> ScreenSize {
        ScreenSize::new(self.screen_width, self.screen_height)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the platform path, or defaults if there is none.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AgentConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config at `path`, returning `AgentConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AgentConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AgentConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory plus the `gazelink` folder.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("gazelink"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gazelink"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("gazelink")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
