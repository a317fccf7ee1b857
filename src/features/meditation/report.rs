//! Meditation reports.
//!
//! Summarizes journal entries over a period.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::duration::format_duration;
use super::journal::{JournalEntry, SqliteJournal};
use crate::error::MindfulError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Everything in the journal
    AllTime,
}

impl ReportPeriod {
    /// First and last date covered, relative to `today`.
    #[must_use]
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            Self::Today => today,
            Self::Week => today - Duration::days(6),
            Self::Month => today - Duration::days(29),
            Self::AllTime => NaiveDate::MIN,
        };
        (start, today)
    }

    /// Parse period from string, defaulting to a week.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "today" | "t" | "d" => Self::Today,
            "month" | "m" | "30d" => Self::Month,
            "all" | "alltime" | "all-time" => Self::AllTime,
            _ => Self::Week,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::AllTime => "All Time",
        }
    }
}

/// Meditation totals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMinutes {
    /// Date
    pub date: String,
    /// Total minutes
    pub minutes: i64,
    /// Session count
    pub sessions: i64,
}

/// Report data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationReport {
    /// Report period name
    pub period: String,
    /// Total time in minutes
    pub total_minutes: i64,
    /// Number of sessions
    pub sessions: i64,
    /// Average session length in minutes
    pub avg_session_minutes: f64,
    /// Longest session in minutes
    pub longest_session_minutes: i64,
    /// Minutes by day of week, Monday first
    pub by_day_of_week: [i64; 7],
    /// Daily breakdown, newest first
    pub daily: Vec<DailyMinutes>,
    /// Consecutive days with a session, ending today or yesterday
    pub streak_days: i64,
}

impl MeditationReport {
    /// Generate a report for the given period.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be queried.
    pub fn generate(journal: &SqliteJournal, period: ReportPeriod) -> Result<Self, MindfulError> {
        let today = Local::now().date_naive();
        let (start, end) = period.date_range(today);
        let entries = journal.between(start, end)?;
        Ok(Self::from_entries(&entries, period, today))
    }

    /// Build a report from already-loaded entries.
    #[must_use]
    pub fn from_entries(entries: &[JournalEntry], period: ReportPeriod, today: NaiveDate) -> Self {
        let total_minutes: i64 = entries.iter().map(|e| i64::from(e.duration_minutes)).sum();
        let sessions = entries.len() as i64;

        let avg_session_minutes = if sessions > 0 {
            total_minutes as f64 / sessions as f64
        } else {
            0.0
        };

        let longest_session_minutes = entries
            .iter()
            .map(|e| i64::from(e.duration_minutes))
            .max()
            .unwrap_or(0);

        let mut by_day_of_week = [0i64; 7];
        for entry in entries {
            let weekday = entry.date.weekday().num_days_from_monday() as usize;
            by_day_of_week[weekday] += i64::from(entry.duration_minutes);
        }

        let mut daily_map: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for entry in entries {
            let day = daily_map.entry(entry.date).or_insert((0, 0));
            day.0 += i64::from(entry.duration_minutes);
            day.1 += 1;
        }

        let mut days: Vec<NaiveDate> = daily_map.keys().copied().collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        let streak_days = calculate_streak(&days, today);

        let daily = days
            .iter()
            .map(|date| {
                let (minutes, sessions) = daily_map[date];
                DailyMinutes {
                    date: date.to_string(),
                    minutes,
                    sessions,
                }
            })
            .collect();

        Self {
            period: period.display_name().to_string(),
            total_minutes,
            sessions,
            avg_session_minutes,
            longest_session_minutes,
            by_day_of_week,
            daily,
            streak_days,
        }
    }

    /// Format the report for display.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("🧘 Meditation Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  Total time:       {}",
            format_duration(Duration::minutes(self.total_minutes))
        ));
        lines.push(format!("  Sessions:         {}", self.sessions));
        lines.push(format!(
            "  Average session:  {:.0} minutes",
            self.avg_session_minutes
        ));
        lines.push(format!(
            "  Longest session:  {} minutes",
            self.longest_session_minutes
        ));
        lines.push(format!("  Current streak:   {} days", self.streak_days));
        lines.push(String::new());

        if self.total_minutes > 0 {
            lines.push("By Day of Week".to_string());
            lines.push("─".repeat(40));
            let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
            let max_day = self.by_day_of_week.iter().max().copied().unwrap_or(1).max(1);

            for (i, day) in days.iter().enumerate() {
                let minutes = self.by_day_of_week[i];
                let bar_len = (minutes as f64 / max_day as f64 * 20.0) as usize;
                lines.push(format!("  {} {:>4}m {}", day, minutes, "█".repeat(bar_len)));
            }
            lines.push(String::new());
        }

        if !self.daily.is_empty() {
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));

            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>4}m ({} sessions)",
                    day.date, day.minutes, day.sessions
                ));
            }
        }

        lines.join("\n")
    }
}

/// Count consecutive days ending today, or yesterday if today is empty.
///
/// `days` must be sorted newest first without duplicates.
fn calculate_streak(days: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut check_date = today;
    if !days.contains(&today) {
        check_date = today - Duration::days(1);
    }

    let mut streak = 0;
    while days.contains(&check_date) {
        streak += 1;
        check_date -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::features::meditation::record::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn entry(id: i64, minutes: u32, day: &str) -> JournalEntry {
        JournalEntry {
            id,
            user: "ana".to_string(),
            duration_minutes: minutes,
            date: date(day),
            note: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(ReportPeriod::parse("today"), ReportPeriod::Today);
        assert_eq!(ReportPeriod::parse("week"), ReportPeriod::Week);
        assert_eq!(ReportPeriod::parse("month"), ReportPeriod::Month);
        assert_eq!(ReportPeriod::parse("all"), ReportPeriod::AllTime);
        assert_eq!(ReportPeriod::parse("whatever"), ReportPeriod::Week);
    }

    #[test]
    fn test_period_range() {
        let today = date("2026-10-16");
        assert_eq!(ReportPeriod::Today.date_range(today), (today, today));
        assert_eq!(ReportPeriod::Week.date_range(today).0, date("2026-10-10"));
        assert_eq!(ReportPeriod::Month.date_range(today).0, date("2026-09-17"));
    }

    #[test]
    fn test_report_totals() {
        let entries = vec![
            entry(1, 10, "2026-10-16"),
            entry(2, 5, "2026-10-16"),
            entry(3, 30, "2026-10-15"),
            entry(4, 15, "2026-10-12"),
        ];
        let report =
            MeditationReport::from_entries(&entries, ReportPeriod::Week, date("2026-10-16"));

        assert_eq!(report.total_minutes, 60);
        assert_eq!(report.sessions, 4);
        assert!((report.avg_session_minutes - 15.0).abs() < 0.01);
        assert_eq!(report.longest_session_minutes, 30);
        assert_eq!(report.streak_days, 2);
        assert_eq!(report.daily[0].date, "2026-10-16");
        assert_eq!(report.daily[0].minutes, 15);
        assert_eq!(report.daily[0].sessions, 2);
        // 2026-10-16 is a Friday
        assert_eq!(report.by_day_of_week[4], 15);
    }

    #[test]
    fn test_streak_from_yesterday() {
        let days = vec![date("2026-10-15"), date("2026-10-14"), date("2026-10-12")];
        assert_eq!(calculate_streak(&days, date("2026-10-16")), 2);
        assert_eq!(calculate_streak(&days, date("2026-10-18")), 0);
        assert_eq!(calculate_streak(&[], date("2026-10-18")), 0);
    }

    #[test]
    fn test_empty_report_formats() {
        let report = MeditationReport::from_entries(&[], ReportPeriod::Today, date("2026-10-16"));
        let text = report.format();
        assert!(text.contains("Meditation Report: Today"));
        assert!(text.contains("Sessions:         0"));
        assert!(!text.contains("By Day of Week"));
    }
}
