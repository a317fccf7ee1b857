//! The local sign-in.
//!
//! Stored in `~/.mindful/credentials.yaml`. Journal submissions carry the
//! user and expiry from here; an authorization failure removes the file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MindfulError;
use crate::features::meditation::journal::{AuthContext, SessionTerminator};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// User name.
    pub user: String,
    /// When the user signed in.
    pub signed_in_at: DateTime<Utc>,
    /// When the sign-in lapses.
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Sign `user` in at `now` for `ttl_hours`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the user name is blank.
    pub fn sign_in(user: &str, ttl_hours: u32, now: DateTime<Utc>) -> Result<Self, MindfulError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(MindfulError::validation("user name cannot be empty"));
        }

        Ok(Self {
            user: user.to_string(),
            signed_in_at: now,
            expires_at: now + Duration::hours(i64::from(ttl_hours)),
        })
    }

    /// Context passed along with journal submissions.
    #[must_use]
    pub fn auth_context(&self) -> AuthContext {
        AuthContext::new(self.user.clone(), Some(self.expires_at))
    }
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the credentials file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current sign-in, if any.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<Credentials>, MindfulError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to read credentials {}: {e}",
                self.path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map(Some).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to parse credentials {}: {e}",
                self.path.display()
            ))
        })
    }

    /// Persist a sign-in, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be written.
    pub fn save(&self, credentials: &Credentials) -> Result<(), MindfulError> {
        let contents = serde_yaml::to_string(credentials)
            .map_err(|e| MindfulError::Config(format!("Failed to serialize credentials: {e}")))?;

        std::fs::write(&self.path, contents).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to write credentials {}: {e}",
                self.path.display()
            ))
        })
    }

    /// Remove the sign-in. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, MindfulError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Context for journal submissions, or `None` when signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials file is unreadable.
    pub fn auth_context(&self) -> Result<Option<AuthContext>, MindfulError> {
        Ok(self.load()?.map(|c| c.auth_context()))
    }
}

impl SessionTerminator for CredentialStore {
    fn terminate(&self, reason: &str) {
        match self.clear() {
            Ok(_) => info!(reason, "signed out"),
            Err(e) => warn!(reason, error = %e, "failed to clear credentials"),
        }
    }
}
