//! The reflection record produced by a finished session.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::duration::SessionDuration;
use crate::error::MindfulError;

/// Date format accepted for the session date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A finished session awaiting submission to the journal.
///
/// Serializes to the journal wire shape:
/// `{"durationMinutes": 5, "date": "2026-10-16", "note": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Length of the session in whole minutes.
    pub duration_minutes: u32,
    /// Calendar date the session counts towards.
    pub date: NaiveDate,
    /// Free-text reflection.
    pub note: Option<String>,
}

impl SessionRecord {
    /// Capture a record for a completed countdown.
    #[must_use]
    pub const fn capture(duration: SessionDuration, date: NaiveDate) -> Self {
        Self {
            duration_minutes: duration.rounded_minutes(),
            date,
            note: None,
        }
    }

    /// Apply the user's reflection edits.
    ///
    /// A blank note clears it. The record is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if `date` is not `YYYY-MM-DD`.
    pub fn apply_reflection(&mut self, note: Option<&str>, date: &str) -> Result<(), MindfulError> {
        let date = parse_date(date)?;
        self.date = date;
        self.note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);
        Ok(())
    }
}

/// Parse an ISO calendar date.
///
/// # Errors
///
/// Returns `MindfulError::Validation` for anything that is not a real date.
pub fn parse_date(s: &str) -> Result<NaiveDate, MindfulError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| MindfulError::validation(format!("invalid date '{s}': {e}")))
}
