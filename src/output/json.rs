//! JSON output formatting for mindful.

use serde::Serialize;
use serde_json::json;

use crate::error::MindfulError;
use crate::features::meditation::{AllowedDurations, JournalEntry};

/// Format journal entries as JSON
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_entries_json(
    entries: &[JournalEntry],
    total_minutes: i64,
) -> Result<String, MindfulError> {
    let output = json!({
        "count": entries.len(),
        "totalMinutes": total_minutes,
        "items": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the allowed durations as JSON
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_durations_json(allowed: &AllowedDurations) -> Result<String, MindfulError> {
    let minutes: Vec<u32> = allowed.as_slice().iter().map(|d| d.rounded_minutes()).collect();
    let output = json!({
        "count": minutes.len(),
        "minutes": minutes
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value as pretty JSON
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, MindfulError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_entry() -> JournalEntry {
        JournalEntry {
            id: 7,
            user: "ana".to_string(),
            duration_minutes: 10,
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            note: Some("calm".to_string()),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 7, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_entries_json() {
        let json = format_entries_json(&[sample_entry()], 10).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["totalMinutes"], 10);
        assert_eq!(parsed["items"][0]["durationMinutes"], 10);
        assert_eq!(parsed["items"][0]["date"], "2026-10-16");
        assert_eq!(parsed["items"][0]["note"], "calm");
    }

    #[test]
    fn test_format_durations_json() {
        let allowed = AllowedDurations::from_minutes(&[10, 5]).unwrap();
        let json = format_durations_json(&allowed).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["minutes"], serde_json::json!([5, 10]));
    }
}
