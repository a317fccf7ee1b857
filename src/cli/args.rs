use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "mindful")]
#[command(about = "A terminal meditation timer with a session journal")]
#[command(long_about = "mindful - A terminal meditation timer

Pick a session length, sit through the countdown, then jot down a note
and save the session to your journal.

QUICK START:
  mindful login ana         Sign in so sessions can be saved
  mindful sit               Open the session screen
  mindful sit -d 10         Start a 10 minute session right away
  mindful history           List recent sessions
  mindful report --period month

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  mindful <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a meditation session
    ///
    /// Opens the full-screen session view. Choose a length, sit through
    /// the countdown, then review and save the session.
    ///
    /// # Keys
    ///
    ///   Selecting:   ↑/↓ choose, Enter start, q quit
    ///   Meditating:  Space pause/resume, s stop, b/Esc back
    ///   Reviewing:   Tab switch field, Ctrl+S save, Ctrl+D discard
    ///
    /// # Examples
    ///
    ///   mindful sit               Choose the length on screen
    ///   mindful sit -d 5          Start a 5 minute session immediately
    ///   mindful sit -d 15m        Same, with a unit
    #[command(alias = "s")]
    Sit {
        /// Session length (e.g. 5, 10m, 1h); must be one of the allowed lengths
        #[arg(long, short = 'd')]
        duration: Option<String>,
    },

    /// List the allowed session lengths
    ///
    /// Configured under `meditation.durations_minutes` in
    /// ~/.mindful/config.yaml.
    Durations,

    /// List recent journal entries
    ///
    /// # Examples
    ///
    ///   mindful history             Last 10 sessions
    ///   mindful history -n 50       Last 50 sessions
    ///   mindful history -o json     Output as JSON
    #[command(alias = "h")]
    History {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Summarize meditation time over a period
    ///
    /// Shows total time, session count, average and longest session,
    /// the current streak and a daily breakdown.
    ///
    /// # Examples
    ///
    ///   mindful report                  This week
    ///   mindful report -p today
    ///   mindful report -p all -o json
    Report {
        /// Period (today, week, month, all)
        #[arg(long, short = 'p', default_value = "week")]
        period: String,
    },

    /// Sign in so finished sessions can be saved
    Login {
        /// User name
        user: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Generate shell completions
    ///
    /// Example: mindful completions bash > ~/.bash_completion.d/mindful
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
