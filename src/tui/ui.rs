//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::features::meditation::{format_mmss, FlowSnapshot, Phase, RunPhase};
use crate::tui::app::{App, ReviewField};

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let snapshot = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, &snapshot, chunks[0]);
    match snapshot.phase {
        Phase::Selecting => render_selecting(frame, app, chunks[1]),
        Phase::InProgress => render_countdown(frame, &snapshot, chunks[1]),
        Phase::Reviewing => render_review(frame, app, &snapshot, chunks[1]),
    }
    render_status_bar(frame, app, &snapshot, chunks[2]);
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, snapshot: &FlowSnapshot, area: Rect) {
    let screen = match snapshot.phase {
        Phase::Selecting => "Choose a length",
        Phase::InProgress => "Session",
        Phase::Reviewing => "Reflect",
    };
    let user = app.user.as_deref().unwrap_or("not signed in");

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" 🧘 mindful · {screen} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {user}"), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_selecting(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .durations
        .iter()
        .enumerate()
        .map(|(i, duration)| {
            let style = if i == app.selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("  {duration}"), style)))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Durations "))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_countdown(frame: &mut Frame<'_>, snapshot: &FlowSnapshot, area: Rect) {
    let paused = snapshot.run_phase == Some(RunPhase::Paused);
    let (title, color) = if paused {
        (" Paused ", Color::Yellow)
    } else {
        (" Meditating… ", Color::Green)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let remaining = format_mmss(snapshot.remaining_seconds.unwrap_or(0));
    let clock = Paragraph::new(remaining)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    frame.render_widget(clock, rows[1]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(snapshot.progress().clamp(0.0, 1.0))
        .label(format!("{:.0}%", snapshot.progress() * 100.0));
    frame.render_widget(gauge, rows[3]);
}

fn render_review(frame: &mut Frame<'_>, app: &App, snapshot: &FlowSnapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let minutes = snapshot
        .pending
        .as_ref()
        .map_or(0, |record| record.duration_minutes);
    let summary = Paragraph::new(format!(
        "Session complete: {minutes} minute{}",
        if minutes == 1 { "" } else { "s" }
    ))
    .style(Style::default().fg(Color::Green))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(summary, rows[0]);

    frame.render_widget(
        field(" Date (YYYY-MM-DD) ", &app.date, app.field == ReviewField::Date),
        rows[1],
    );
    frame.render_widget(
        field(" Note ", &app.note, app.field == ReviewField::Note).wrap(Wrap { trim: false }),
        rows[2],
    );
}

fn field<'a>(title: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let text = if focused {
        format!("{value}▏")
    } else {
        value.to_string()
    };
    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border)),
    )
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, snapshot: &FlowSnapshot, area: Rect) {
    let (text, style) = if let Some(error) = &snapshot.last_error {
        (error.clone(), Style::default().fg(Color::Red))
    } else if let Some(status) = &app.status {
        (status.clone(), Style::default().fg(Color::Yellow))
    } else {
        let help = match snapshot.phase {
            Phase::Selecting => "j/k:choose | Enter:start | ?:help | q:quit",
            Phase::InProgress => "Space:pause/resume | s:stop | b/Esc:back",
            Phase::Reviewing => "Tab:switch field | Ctrl+S:save | Ctrl+D:discard",
        };
        (help.to_string(), Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;
    use tokio::runtime::Builder;

    use crate::config::CredentialStore;
    use crate::features::meditation::journal::MockJournalService;
    use crate::features::meditation::{AllowedDurations, SessionController, SessionFlow};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_selection_then_countdown() {
        let rt = Builder::new_current_thread().enable_time().build().unwrap();
        let dir = TempDir::new().unwrap();
        let allowed = AllowedDurations::from_minutes(&[5, 10]).unwrap();
        let controller = SessionController::new(
            SessionFlow::new(allowed.clone()),
            Arc::new(MockJournalService::new()),
        );
        let mut app = App::new(
            controller,
            rt.handle().clone(),
            allowed.as_slice().to_vec(),
            CredentialStore::new(dir.path().join("credentials.yaml")),
        );
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Durations"));
        assert!(text.contains("not signed in"));

        app.start_selected();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("05:00"));
        assert!(text.contains("Space:pause/resume"));
    }
}
