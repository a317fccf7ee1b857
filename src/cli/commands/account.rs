//! Sign-in commands.

use chrono::Utc;
use colored::Colorize;
use serde_json::json;
use tracing::info;

use crate::cli::args::OutputFormat;
use crate::config::{Config, CredentialStore, Credentials, Paths};
use crate::error::MindfulError;
use crate::output::{format_account, to_json};

/// Sign `user` in.
///
/// # Errors
///
/// Returns an error if the user name is blank or the credentials cannot be
/// written.
pub fn login(
    paths: &Paths,
    config: &Config,
    user: &str,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    paths.ensure_dirs()?;
    let credentials = Credentials::sign_in(user, config.account.session_ttl_hours, Utc::now())?;
    CredentialStore::new(&paths.credentials).save(&credentials)?;
    info!(user = %credentials.user, "signed in");

    match format {
        OutputFormat::Json => format_account(Some(&credentials), format),
        OutputFormat::Pretty => Ok(format!(
            "{} Signed in as {}",
            "✓".green(),
            credentials.user.bold()
        )),
    }
}

/// Sign out.
///
/// # Errors
///
/// Returns an error if the credentials file cannot be removed.
pub fn logout(paths: &Paths, format: OutputFormat) -> Result<String, MindfulError> {
    let removed = CredentialStore::new(&paths.credentials).clear()?;
    if removed {
        info!("signed out");
    }

    match format {
        OutputFormat::Json => to_json(&json!({ "signedOut": removed })),
        OutputFormat::Pretty if removed => Ok(format!("{} Signed out", "✓".green())),
        OutputFormat::Pretty => Ok("Not signed in".dimmed().to_string()),
    }
}

/// Show the current sign-in.
///
/// # Errors
///
/// Returns an error if the credentials file is unreadable.
pub fn whoami(paths: &Paths, format: OutputFormat) -> Result<String, MindfulError> {
    let credentials = CredentialStore::new(&paths.credentials).load()?;
    format_account(credentials.as_ref(), format)
}
