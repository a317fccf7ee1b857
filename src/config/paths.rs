//! Path resolution for mindful configuration and data files.
//!
//! All mindful data is stored in `~/.mindful/`:
//! - `config.yaml` - Main configuration file
//! - `journal.db` - SQLite journal of finished sessions
//! - `credentials.yaml` - Current sign-in
//! - `logs/mindful.log` - Diagnostic log

use std::path::PathBuf;

use crate::error::MindfulError;

/// Paths to mindful configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.mindful/`
    pub root: PathBuf,
    /// Config file: `~/.mindful/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.mindful/journal.db`
    pub database: PathBuf,
    /// Sign-in file: `~/.mindful/credentials.yaml`
    pub credentials: PathBuf,
    /// Log directory: `~/.mindful/logs/`
    pub logs: PathBuf,
    /// Log file: `~/.mindful/logs/mindful.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, MindfulError> {
        let home = std::env::var("HOME").map_err(|_| {
            MindfulError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".mindful")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        let logs = root.join("logs");
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("journal.db"),
            credentials: root.join("credentials.yaml"),
            log_file: logs.join("mindful.log"),
            logs,
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), MindfulError> {
        for dir in [&self.root, &self.logs] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    MindfulError::Config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
            }
        }

        Ok(())
    }
}
