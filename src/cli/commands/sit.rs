//! Interactive session command.

use std::sync::Arc;

use tracing::info;

use super::open_journal;
use crate::config::{Config, CredentialStore, Paths};
use crate::error::MindfulError;
use crate::features::meditation::{
    parse_duration, Chime, SessionController, SessionDuration, SessionFlow, SilentChime,
    TerminalBell,
};
use crate::tui::{self, App};

/// Open the session screen, optionally starting a session right away.
///
/// # Errors
///
/// Returns an error if the duration is invalid or not allowed, the journal
/// cannot be opened, or the terminal cannot be set up.
pub fn sit(paths: &Paths, config: &Config, duration: Option<&str>) -> Result<String, MindfulError> {
    let allowed = config.allowed_durations()?;
    let preselect = duration
        .map(|d| parse_preselect(d).and_then(|parsed| allowed.check(parsed)))
        .transpose()?;

    let journal = open_journal(paths)?;
    let credentials = CredentialStore::new(&paths.credentials);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    let chime: Arc<dyn Chime> = if config.meditation.chime {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentChime)
    };
    let controller = SessionController::new(SessionFlow::new(allowed.clone()), Arc::new(journal))
        .with_chime(chime)
        .with_terminator(Arc::new(credentials.clone()));

    let mut app = App::new(
        controller,
        runtime.handle().clone(),
        allowed.as_slice().to_vec(),
        credentials,
    );
    if let Some(duration) = preselect {
        app.start(duration);
    }

    info!("session screen opened");
    tui::run(app)?;
    Ok(String::new())
}

fn parse_preselect(s: &str) -> Result<SessionDuration, MindfulError> {
    parse_duration(s).ok_or_else(|| {
        MindfulError::validation(format!("Invalid duration: {s}. Try 5, 10m or 1h"))
    })
}
