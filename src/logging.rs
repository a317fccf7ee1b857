//! Diagnostic logging.
//!
//! Logs go to `~/.mindful/logs/mindful.log` so the full-screen session view
//! keeps the terminal to itself. `RUST_LOG` overrides the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Paths;

/// Build the filter from `RUST_LOG`, falling back to `level`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// If the log file cannot be opened, logging is disabled rather than
/// written to the terminal. Calling this twice is harmless.
pub fn init(paths: &Paths, level: &str) {
    let filter = env_filter(level);

    let file = paths.ensure_dirs().ok().and_then(|()| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&paths.log_file)
            .ok()
    });

    let Some(file) = file else {
        let _ = tracing_subscriber::registry().with(filter).try_init();
        return;
    };

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(path = %paths.log_file.display(), "logging initialized");
    }
}
