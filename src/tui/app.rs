//! Application state for the session screen.

use tokio::runtime::Handle;
use tracing::warn;

use crate::config::CredentialStore;
use crate::error::MindfulError;
use crate::features::meditation::{
    FlowSnapshot, Phase, RunPhase, SessionController, SessionDuration,
};

/// Which reflection field has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewField {
    /// Free-text note.
    Note,
    /// Session date.
    Date,
}

/// Application state.
pub struct App {
    controller: SessionController,
    runtime: Handle,
    credentials: CredentialStore,
    /// Session lengths on the selection screen.
    pub durations: Vec<SessionDuration>,
    /// Currently selected index.
    pub selected: usize,
    /// Note being edited on the review screen.
    pub note: String,
    /// Date being edited on the review screen.
    pub date: String,
    /// Field with the cursor.
    pub field: ReviewField,
    /// Status message to display.
    pub status: Option<String>,
    /// Signed-in user, if any.
    pub user: Option<String>,
    review_loaded: bool,
}

impl App {
    /// Create a new app instance.
    pub fn new(
        controller: SessionController,
        runtime: Handle,
        durations: Vec<SessionDuration>,
        credentials: CredentialStore,
    ) -> Self {
        let mut app = Self {
            controller,
            runtime,
            credentials,
            durations,
            selected: 0,
            note: String::new(),
            date: String::new(),
            field: ReviewField::Note,
            status: None,
            user: None,
            review_loaded: false,
        };
        app.refresh_user();
        app
    }

    /// Latest published flow state.
    pub fn snapshot(&self) -> FlowSnapshot {
        self.controller.snapshot()
    }

    /// Pick up state changes made by the ticker.
    ///
    /// Entering the review screen loads the captured date into the editor.
    pub fn sync(&mut self) {
        let snapshot = self.snapshot();
        match (snapshot.phase, &snapshot.pending) {
            (Phase::Reviewing, Some(record)) if !self.review_loaded => {
                self.date = record.date.to_string();
                self.note = record.note.clone().unwrap_or_default();
                self.field = ReviewField::Note;
                self.review_loaded = true;
            }
            (Phase::Reviewing, _) => {}
            _ => self.review_loaded = false,
        }
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.durations.len() {
            self.selected += 1;
        }
    }

    /// Start a session with the highlighted length.
    pub fn start_selected(&mut self) {
        if let Some(&duration) = self.durations.get(self.selected) {
            self.start(duration);
        }
    }

    /// Start a session of `duration`.
    pub fn start(&mut self, duration: SessionDuration) {
        self.status = None;
        let result = self.runtime.block_on(self.controller.select_duration(duration));
        self.report(result);
    }

    /// Pause a running session or resume a paused one.
    pub fn toggle_pause(&mut self) {
        let result = match self.snapshot().run_phase {
            Some(RunPhase::Running) => self.runtime.block_on(self.controller.pause()),
            Some(RunPhase::Paused) => self.runtime.block_on(self.controller.resume()),
            _ => Ok(()),
        };
        self.report(result);
    }

    /// Cancel the session.
    pub fn stop(&mut self) {
        let result = self.runtime.block_on(self.controller.stop());
        self.report(result);
    }

    /// Leave the countdown screen.
    pub fn back(&mut self) {
        let result = self.runtime.block_on(self.controller.back());
        self.report(result);
    }

    /// Save the edited reflection to the journal.
    pub fn submit(&mut self) {
        let auth = match self.credentials.auth_context() {
            Ok(Some(auth)) => auth,
            Ok(None) => {
                self.status = Some(
                    "Not signed in. Run 'mindful login <user>', then press Ctrl+S again".to_string(),
                );
                return;
            }
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        let note = Some(self.note.as_str());
        let result = self.runtime.block_on(async {
            self.controller.update_reflection(note, &self.date).await?;
            self.controller.submit(&auth).await
        });

        match result {
            Ok(()) => self.status = Some("Session saved to journal".to_string()),
            Err(e) => {
                warn!(error = %e, "could not save session");
                self.status = Some(e.to_string());
            }
        }
        self.refresh_user();
    }

    /// Throw away the finished session.
    pub fn discard(&mut self) {
        let result = self.runtime.block_on(self.controller.discard());
        if result.is_ok() {
            self.status = Some("Session discarded".to_string());
        }
        self.report(result);
    }

    /// Move the cursor to the other reflection field.
    pub fn switch_field(&mut self) {
        self.field = match self.field {
            ReviewField::Note => ReviewField::Date,
            ReviewField::Date => ReviewField::Note,
        };
    }

    /// Type into the focused field.
    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    /// Delete the last character of the focused field.
    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            ReviewField::Note => &mut self.note,
            ReviewField::Date => &mut self.date,
        }
    }

    fn refresh_user(&mut self) {
        self.user = self
            .credentials
            .load()
            .ok()
            .flatten()
            .map(|c| c.user);
    }

    fn report(&mut self, result: Result<(), MindfulError>) {
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }
}
