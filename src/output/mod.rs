//! Output formatting for mindful.
//!
//! Every command result is rendered either as colored text or as JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::config::Credentials;
use crate::error::MindfulError;
use crate::features::meditation::{AllowedDurations, JournalEntry, MeditationReport};

pub use json::*;
pub use pretty::*;

/// Format journal entries based on output format
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_entries(
    entries: &[JournalEntry],
    total_minutes: i64,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_entries_pretty(entries, total_minutes)),
        OutputFormat::Json => format_entries_json(entries, total_minutes),
    }
}

/// Format a report based on output format
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_report(report: &MeditationReport, format: OutputFormat) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(report.format()),
        OutputFormat::Json => to_json(report),
    }
}

/// Format the allowed durations based on output format
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_durations(
    allowed: &AllowedDurations,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_durations_pretty(allowed)),
        OutputFormat::Json => format_durations_json(allowed),
    }
}

/// Format the sign-in state based on output format
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_account(
    credentials: Option<&Credentials>,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_account_pretty(credentials)),
        OutputFormat::Json => to_json(&serde_json::json!({
            "signedIn": credentials.is_some(),
            "user": credentials.map(|c| c.user.as_str()),
            "expiresAt": credentials.map(|c| c.expires_at),
        })),
    }
}
