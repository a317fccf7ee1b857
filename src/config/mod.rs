//! Configuration management for mindful.
//!
//! This module handles loading and saving configuration from `~/.mindful/`.

mod credentials;
mod paths;
mod settings;

pub use credentials::{CredentialStore, Credentials};
pub use paths::Paths;
pub use settings::{AccountConfig, ColorSetting, Config, GeneralConfig, MeditationConfig};
