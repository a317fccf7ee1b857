//! Command implementations for mindful.
//!
//! Every command returns the text to print, already formatted.

mod account;
mod history;
mod sit;

pub use account::{login, logout, whoami};
pub use history::{history, report};
pub use sit::sit;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::{Cli, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::MindfulError;
use crate::features::meditation::SqliteJournal;
use crate::output::format_durations;
use crate::storage::Database;

/// Open the journal under `paths`, creating it if needed.
fn open_journal(paths: &Paths) -> Result<SqliteJournal, MindfulError> {
    paths.ensure_dirs()?;
    Ok(SqliteJournal::with_database(Database::open_at(&paths.database)?))
}

/// Execute durations command
///
/// # Errors
///
/// Returns an error if the configured list is invalid or output formatting fails.
pub fn durations(config: &Config, format: OutputFormat) -> Result<String, MindfulError> {
    format_durations(&config.allowed_durations()?, format)
}

/// Generate a completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, MindfulError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "mindful", &mut buf);
    String::from_utf8(buf).map_err(|e| MindfulError::Config(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_mention_subcommands() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("mindful"));
        assert!(script.contains("history"));
    }

    #[test]
    fn test_durations_json() {
        let out = durations(&Config::default(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["minutes"], serde_json::json!([1, 2, 5, 10, 15, 30]));
    }
}
