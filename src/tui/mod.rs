//! Terminal User Interface (TUI) for meditation sessions.
//!
//! Built with ratatui and crossterm. The screen follows the session flow:
//! duration selection, the running countdown, then the reflection editor.

mod app;
mod event;
mod ui;

pub use app::{App, ReviewField};

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::MindfulError;

/// Run the TUI application until the user quits.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(mut app: App) -> Result<(), MindfulError> {
    enable_raw_mode()
        .map_err(|e| MindfulError::Config(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| MindfulError::Config(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| MindfulError::Config(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), MindfulError> {
    loop {
        app.sync();

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| MindfulError::Config(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::handle_events(app)? {
            match action {
                event::Action::Quit => break,
                event::Action::Start => app.start_selected(),
                event::Action::TogglePause => app.toggle_pause(),
                event::Action::Stop => app.stop(),
                event::Action::Back => app.back(),
                event::Action::Submit => app.submit(),
                event::Action::Discard => app.discard(),
            }
        }
    }

    Ok(())
}
