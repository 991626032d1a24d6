//! Configuration management (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. Missing or unreadable files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Slowest allowed pacing, in seconds per bead
pub const MAX_SPEED: f64 = 10.0;

/// Fastest allowed pacing, in seconds per bead
pub const MIN_SPEED: f64 = 1.0;

/// Default pacing, in seconds per bead
pub const DEFAULT_SPEED: f64 = 1.5;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// Playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Seconds to wait per bead after each announcement (default: 1.5, range: 1.0-10.0)
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
        }
    }
}

impl PlaybackConfig {
    /// Pacing clamped into the supported range.
    pub fn speed(&self) -> f64 {
        if self.speed.is_finite() {
            self.speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            DEFAULT_SPEED
        }
    }

    /// Adjust the speed by `delta`, keeping it in range.
    pub fn nudge_speed(&mut self, delta: f64) {
        self.speed = (self.speed() + delta).clamp(MIN_SPEED, MAX_SPEED);
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\beadreader\BeadReader\config`
/// On macOS: `~/Library/Application Support/io.beadreader.BeadReader`
/// On Linux: `~/.config/beadreader`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "beadreader", "BeadReader")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml` inside [`config_dir`].
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    config_path().map(|path| load_from(&path)).unwrap_or_default()
}

/// Loads the configuration from a specific file, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Saves the configuration to the platform config directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file
/// cannot be written.
pub fn save(config: &Config) -> std::io::Result<()> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to a specific file, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, content)
}
