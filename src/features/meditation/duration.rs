//! Session durations: the allowed set, parsing, and formatting.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::MindfulError;

/// Default allowed durations in minutes.
pub const DEFAULT_DURATIONS_MINUTES: [u32; 6] = [1, 2, 5, 10, 15, 30];

/// A positive number of seconds chosen for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionDuration(u32);

impl SessionDuration {
    /// Create a duration from seconds.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if `seconds` is zero.
    pub fn from_secs(seconds: u32) -> Result<Self, MindfulError> {
        if seconds == 0 {
            return Err(MindfulError::validation("duration must be greater than zero"));
        }
        Ok(Self(seconds))
    }

    /// Create a duration from whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if `minutes` is zero or overflows.
    pub fn from_minutes(minutes: u32) -> Result<Self, MindfulError> {
        let seconds = minutes
            .checked_mul(60)
            .ok_or_else(|| MindfulError::validation(format!("{minutes} minutes is too long")))?;
        Self::from_secs(seconds)
    }

    /// Seconds in this duration.
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// Whole minutes, rounded half-up and never below one.
    #[must_use]
    pub const fn rounded_minutes(self) -> u32 {
        let minutes = self.0.saturating_add(30) / 60;
        if minutes == 0 {
            1
        } else {
            minutes
        }
    }

    /// Convert to a `chrono::Duration`.
    #[must_use]
    pub fn to_chrono(self) -> Duration {
        Duration::seconds(i64::from(self.0))
    }
}

impl TryFrom<u32> for SessionDuration {
    type Error = MindfulError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::from_secs(seconds)
    }
}

impl From<SessionDuration> for u32 {
    fn from(d: SessionDuration) -> Self {
        d.0
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.to_chrono()))
    }
}

/// The enumerated set of durations a session may be started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDurations {
    values: Vec<SessionDuration>,
}

impl AllowedDurations {
    /// Build the set from minute values, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if the list is empty or contains zero.
    pub fn from_minutes(minutes: &[u32]) -> Result<Self, MindfulError> {
        if minutes.is_empty() {
            return Err(MindfulError::validation("at least one duration must be allowed"));
        }

        let mut values = minutes
            .iter()
            .map(|m| SessionDuration::from_minutes(*m))
            .collect::<Result<Vec<_>, _>>()?;
        values.sort_unstable();
        values.dedup();

        Ok(Self { values })
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, duration: SessionDuration) -> bool {
        self.values.contains(&duration)
    }

    /// Validate a duration against the set.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if the duration is not allowed.
    pub fn check(&self, duration: SessionDuration) -> Result<SessionDuration, MindfulError> {
        if self.contains(duration) {
            Ok(duration)
        } else {
            Err(MindfulError::validation(format!(
                "{duration} is not one of the allowed durations ({})",
                self.describe()
            )))
        }
    }

    /// All allowed durations, shortest first.
    #[must_use]
    pub fn as_slice(&self) -> &[SessionDuration] {
        &self.values
    }

    /// Number of allowed durations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; the set is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn describe(&self) -> String {
        self.values
            .iter()
            .map(|d| format!("{}m", d.rounded_minutes()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for AllowedDurations {
    fn default() -> Self {
        Self {
            values: DEFAULT_DURATIONS_MINUTES
                .iter()
                .map(|m| SessionDuration(m * 60))
                .collect(),
        }
    }
}

/// Format seconds as MM:SS.
#[must_use]
pub fn format_mmss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Parse a duration string like "5", "5m", "1h30m", "90s".
///
/// A bare number is read as minutes.
#[must_use]
pub fn parse_duration(s: &str) -> Option<SessionDuration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<u32>() {
        return SessionDuration::from_minutes(minutes).ok();
    }

    let mut total_seconds: u32 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if !current_num.is_empty() {
            let num: u32 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        } else {
            return None;
        }
    }

    // Trailing number without unit counts as minutes
    if !current_num.is_empty() {
        let num: u32 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    SessionDuration::from_secs(total_seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_minutes() {
        assert_eq!(SessionDuration::from_secs(60).unwrap().rounded_minutes(), 1);
        assert_eq!(SessionDuration::from_secs(89).unwrap().rounded_minutes(), 1);
        assert_eq!(SessionDuration::from_secs(90).unwrap().rounded_minutes(), 2);
        assert_eq!(SessionDuration::from_secs(1800).unwrap().rounded_minutes(), 30);
        assert_eq!(SessionDuration::from_secs(10).unwrap().rounded_minutes(), 1);
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(matches!(
            SessionDuration::from_secs(0),
            Err(MindfulError::Validation(_))
        ));
        assert!(SessionDuration::from_minutes(0).is_err());
    }

    #[test]
    fn test_default_allowed_set() {
        let allowed = AllowedDurations::default();
        let secs: Vec<u32> = allowed.as_slice().iter().map(|d| d.as_secs()).collect();
        assert_eq!(secs, vec![60, 120, 300, 600, 900, 1800]);
    }

    #[test]
    fn test_allowed_check_rejects_unlisted() {
        let allowed = AllowedDurations::default();
        let odd = SessionDuration::from_secs(420).unwrap();
        let err = allowed.check(odd).unwrap_err();
        assert!(matches!(err, MindfulError::Validation(_)));
        assert!(err.to_string().contains("7 minutes"));
    }

    #[test]
    fn test_allowed_from_minutes_sorts_and_dedups() {
        let allowed = AllowedDurations::from_minutes(&[10, 5, 10]).unwrap();
        assert_eq!(allowed.len(), 2);
        assert_eq!(allowed.as_slice()[0].as_secs(), 300);
        assert!(AllowedDurations::from_minutes(&[]).is_err());
        assert!(AllowedDurations::from_minutes(&[5, 0]).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5").map(SessionDuration::as_secs), Some(300));
        assert_eq!(parse_duration("5m").map(SessionDuration::as_secs), Some(300));
        assert_eq!(parse_duration("90s").map(SessionDuration::as_secs), Some(90));
        assert_eq!(parse_duration("1h30m").map(SessionDuration::as_secs), Some(5400));
        assert_eq!(parse_duration("1m30s").map(SessionDuration::as_secs), Some(90));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("0").is_none());
        assert!(parse_duration("5x").is_none());
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(1500), "25:00");
        assert_eq!(format_mmss(90), "01:30");
        assert_eq!(format_mmss(0), "00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(25)), "25 minutes");
        assert_eq!(format_duration(Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(Duration::hours(2)), "2 hours");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour, 30 minutes");
        assert_eq!(format_duration(Duration::seconds(45)), "45 seconds");
    }
}
