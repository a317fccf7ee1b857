use chrono::Utc;
use colored::Colorize;

use crate::config::Credentials;
use crate::features::meditation::{format_duration, AllowedDurations, JournalEntry};

/// Format journal entries as a list
pub fn format_entries_pretty(entries: &[JournalEntry], total_minutes: i64) -> String {
    if entries.is_empty() {
        return "📜 Journal (0 sessions)\n  No sessions yet. Start one with 'mindful sit'.".to_string();
    }

    let mut output = format!("📜 Journal ({} sessions)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let mut line = format!(
            "{}  {:>3} min",
            entry.date.to_string().yellow(),
            entry.duration_minutes.to_string().bold()
        );

        if let Some(note) = &entry.note {
            line.push_str(&format!("  {}", note.dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "Total: {}",
        format_duration(chrono::Duration::minutes(total_minutes)).green()
    ));

    output
}

/// Format the allowed durations
pub fn format_durations_pretty(allowed: &AllowedDurations) -> String {
    let mut output = format!("Session lengths ({})\n", allowed.len());
    for duration in allowed.as_slice() {
        output.push_str(&format!("  • {duration}\n"));
    }
    output
}

/// Format the sign-in state
pub fn format_account_pretty(credentials: Option<&Credentials>) -> String {
    match credentials {
        Some(creds) if creds.expires_at <= Utc::now() => format!(
            "Sign-in for {} expired at {}",
            creds.user.bold(),
            creds.expires_at.format("%Y-%m-%d %H:%M UTC")
        ),
        Some(creds) => format!(
            "Signed in as {} (until {})",
            creds.user.bold(),
            creds.expires_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => "Not signed in. Use 'mindful login <user>'.".dimmed().to_string(),
    }
}
