//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::MindfulError;
use crate::features::meditation::Phase;
use crate::tui::app::App;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start a session with the highlighted length.
    Start,
    /// Pause or resume the countdown.
    TogglePause,
    /// Cancel the countdown.
    Stop,
    /// Leave the countdown screen.
    Back,
    /// Save the reflection.
    Submit,
    /// Throw the finished session away.
    Discard,
}

/// Poll for terminal events.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App) -> Result<Option<Action>, MindfulError> {
    if !event::poll(Duration::from_millis(100))? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(app, key)),
        _ => Ok(None),
    }
}

/// Map a key press to an action for the current screen.
///
/// Text entry on the review screen is applied to `app` directly.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match app.snapshot().phase {
        Phase::Selecting => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                app.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.select_previous();
                None
            }
            KeyCode::Enter => Some(Action::Start),
            KeyCode::Char('?') => {
                app.status = Some("j/k:choose | Enter:start | q:quit".to_string());
                None
            }
            _ => None,
        },

        Phase::InProgress => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::TogglePause),
            KeyCode::Char('s') => Some(Action::Stop),
            KeyCode::Char('b') | KeyCode::Esc => Some(Action::Back),
            _ => None,
        },

        Phase::Reviewing => match key.code {
            KeyCode::Char('s') if ctrl => Some(Action::Submit),
            KeyCode::Char('d') if ctrl => Some(Action::Discard),
            KeyCode::Tab | KeyCode::BackTab => {
                app.switch_field();
                None
            }
            KeyCode::Backspace => {
                app.pop_char();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                app.push_char(c);
                None
            }
            _ => None,
        },
    }
}
