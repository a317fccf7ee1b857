//! Journal history and report commands.

use super::open_journal;
use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::MindfulError;
use crate::features::meditation::{MeditationReport, ReportPeriod};
use crate::output::{format_entries, format_report};

/// List the most recent journal entries with the all-time total.
///
/// # Errors
///
/// Returns an error if the journal cannot be read.
pub fn history(paths: &Paths, limit: usize, format: OutputFormat) -> Result<String, MindfulError> {
    let journal = open_journal(paths)?;
    let entries = journal.recent(limit)?;
    let total = journal.total_minutes()?;
    format_entries(&entries, total, format)
}

/// Summarize the journal over a period.
///
/// # Errors
///
/// Returns an error if the journal cannot be read.
pub fn report(paths: &Paths, period: &str, format: OutputFormat) -> Result<String, MindfulError> {
    let journal = open_journal(paths)?;
    let report = MeditationReport::generate(&journal, ReportPeriod::parse(period))?;
    format_report(&report, format)
}
