//! Configuration settings for mindful.
//!
//! Settings are loaded from `~/.mindful/config.yaml`. Missing keys fall back
//! to their defaults.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::MindfulError;
use crate::features::meditation::duration::{AllowedDurations, DEFAULT_DURATIONS_MINUTES};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Meditation session settings.
    pub meditation: MeditationConfig,
    /// Sign-in settings.
    pub account: AccountConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply to the global `colored` override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Meditation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeditationConfig {
    /// Session lengths offered on the selection screen, in minutes.
    #[serde(default = "default_durations")]
    pub durations_minutes: Vec<u32>,
    /// Ring the terminal bell when a session ends.
    #[serde(default = "default_true")]
    pub chime: bool,
}

/// Sign-in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// How long a sign-in stays valid, in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u32,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_durations() -> Vec<u32> {
    DEFAULT_DURATIONS_MINUTES.to_vec()
}

const fn default_true() -> bool {
    true
}

const fn default_session_ttl() -> u32 {
    24 * 30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            durations_minutes: default_durations(),
            chime: default_true(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, MindfulError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, MindfulError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), MindfulError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), MindfulError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| MindfulError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// The configured session lengths.
    ///
    /// # Errors
    ///
    /// Returns a config error if the list is empty or contains zero.
    pub fn allowed_durations(&self) -> Result<AllowedDurations, MindfulError> {
        AllowedDurations::from_minutes(&self.meditation.durations_minutes)
            .map_err(|e| MindfulError::Config(format!("meditation.durations_minutes: {e}")))
    }
}
