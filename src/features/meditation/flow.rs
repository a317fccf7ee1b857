//! Session flow: select a duration, sit, reflect, save.
//!
//! `SessionFlow` owns the active countdown and the pending record. It is
//! synchronous; [`super::controller::SessionController`] drives it from the
//! ticker and from user intents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::countdown::{Countdown, CountdownEvent, RunPhase};
use super::duration::{AllowedDurations, SessionDuration};
use super::record::SessionRecord;
use crate::error::{MindfulError, PersistenceError};

/// Top-level mode of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Choosing a duration.
    Selecting,
    /// A countdown is running or paused.
    InProgress,
    /// Countdown finished; collecting the reflection.
    Reviewing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selecting => write!(f, "Selecting"),
            Self::InProgress => write!(f, "In progress"),
            Self::Reviewing => write!(f, "Reviewing"),
        }
    }
}

/// Everything the presentation layer needs to render the flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Run phase of the active countdown.
    pub run_phase: Option<RunPhase>,
    /// Seconds left on the active countdown.
    pub remaining_seconds: Option<u32>,
    /// Duration the active countdown was started with.
    pub duration_seconds: Option<u32>,
    /// Record awaiting submission.
    pub pending: Option<SessionRecord>,
    /// Last submission failure, cleared on success or discard.
    pub last_error: Option<String>,
}

impl FlowSnapshot {
    /// Progress of the active countdown (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        match (self.remaining_seconds, self.duration_seconds) {
            (Some(remaining), Some(total)) if total > 0 => {
                1.0 - f64::from(remaining) / f64::from(total)
            }
            _ => 0.0,
        }
    }
}

/// The session orchestrator.
#[derive(Debug)]
pub struct SessionFlow {
    allowed: AllowedDurations,
    phase: Phase,
    countdown: Option<Countdown>,
    pending: Option<SessionRecord>,
    last_error: Option<String>,
}

impl SessionFlow {
    /// Create a flow in the selecting phase.
    #[must_use]
    pub const fn new(allowed: AllowedDurations) -> Self {
        Self {
            allowed,
            phase: Phase::Selecting,
            countdown: None,
            pending: None,
            last_error: None,
        }
    }

    /// Start a countdown for `duration`.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` for a duration outside the allowed
    /// set and `MindfulError::InvalidState` unless selecting. Nothing changes
    /// on error.
    pub fn select_duration(&mut self, duration: SessionDuration) -> Result<(), MindfulError> {
        let duration = self.allowed.check(duration)?;
        self.expect_phase(Phase::Selecting, "select a duration")?;

        let mut countdown = Countdown::new(duration);
        countdown.start()?;

        info!(seconds = duration.as_secs(), "session started");
        self.countdown = Some(countdown);
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Pause the running countdown.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless a countdown is running.
    pub fn pause(&mut self) -> Result<(), MindfulError> {
        self.active_countdown("pause")?.pause()
    }

    /// Resume the paused countdown.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless a countdown is paused.
    pub fn resume(&mut self) -> Result<(), MindfulError> {
        self.active_countdown("resume")?.resume()
    }

    /// Stop the countdown and return to selection.
    ///
    /// Returns whether a countdown was actually cancelled. Stopping while
    /// already selecting does nothing.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` while reviewing.
    pub fn stop(&mut self) -> Result<bool, MindfulError> {
        match self.phase {
            Phase::Selecting => Ok(false),
            Phase::Reviewing => Err(MindfulError::invalid_state(
                "nothing to stop while reviewing; submit or discard instead",
            )),
            Phase::InProgress => {
                let event = self.active_countdown("stop")?.stop()?;
                if event == Some(CountdownEvent::Cancelled) {
                    self.on_countdown_cancelled()?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Leave the countdown screen. Same effect as [`Self::stop`].
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` while reviewing.
    pub fn back(&mut self) -> Result<bool, MindfulError> {
        self.stop()
    }

    /// Apply one elapsed second, moving to review when the countdown ends.
    ///
    /// `today` becomes the default record date if this tick finishes.
    pub fn tick(&mut self, today: NaiveDate) -> Option<CountdownEvent> {
        if self.phase != Phase::InProgress {
            return None;
        }

        let event = self.countdown.as_mut().and_then(Countdown::tick);
        if event == Some(CountdownEvent::Finished) {
            if let Err(e) = self.on_countdown_finished(today) {
                debug!(error = %e, "finish transition rejected");
            }
        }
        event
    }

    /// Capture the pending record and move to review.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless the active countdown has
    /// finished.
    pub fn on_countdown_finished(&mut self, today: NaiveDate) -> Result<(), MindfulError> {
        self.expect_phase(Phase::InProgress, "finish a countdown")?;
        let countdown = self
            .countdown
            .as_ref()
            .filter(|c| c.phase() == RunPhase::Finished)
            .ok_or_else(|| MindfulError::invalid_state("countdown has not finished"))?;

        let record = SessionRecord::capture(countdown.duration(), today);
        info!(minutes = record.duration_minutes, %today, "session finished");

        self.pending = Some(record);
        self.last_error = None;
        self.phase = Phase::Reviewing;
        Ok(())
    }

    /// Discard the countdown and return to selection without a record.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless in progress.
    pub fn on_countdown_cancelled(&mut self) -> Result<(), MindfulError> {
        self.expect_phase(Phase::InProgress, "cancel a countdown")?;
        info!("session cancelled");
        self.countdown = None;
        self.phase = Phase::Selecting;
        Ok(())
    }

    /// Edit the pending record's note and date.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless reviewing and
    /// `MindfulError::Validation` for a malformed date.
    pub fn update_reflection(&mut self, note: Option<&str>, date: &str) -> Result<(), MindfulError> {
        self.expect_phase(Phase::Reviewing, "edit the reflection")?;
        self.pending
            .as_mut()
            .ok_or_else(|| MindfulError::invalid_state("no pending record"))?
            .apply_reflection(note, date)
    }

    /// The record a submission should send.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless reviewing.
    pub fn pending_submission(&self) -> Result<&SessionRecord, MindfulError> {
        self.expect_phase(Phase::Reviewing, "submit")?;
        self.pending
            .as_ref()
            .ok_or_else(|| MindfulError::invalid_state("no pending record"))
    }

    /// Clear the saved record and return to selection.
    pub fn submission_succeeded(&mut self) {
        if let Some(record) = self.pending.take() {
            info!(minutes = record.duration_minutes, date = %record.date, "session saved");
        }
        self.countdown = None;
        self.last_error = None;
        self.phase = Phase::Selecting;
    }

    /// Keep the record and surface the failure.
    pub fn submission_failed(&mut self, error: &PersistenceError) {
        self.last_error = Some(error.to_string());
    }

    /// Abandon the unsaved record and return to selection.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless reviewing.
    pub fn discard(&mut self) -> Result<(), MindfulError> {
        self.expect_phase(Phase::Reviewing, "discard")?;
        info!("pending record discarded");
        self.pending = None;
        self.countdown = None;
        self.last_error = None;
        self.phase = Phase::Selecting;
        Ok(())
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Run phase of the active countdown.
    #[must_use]
    pub fn run_phase(&self) -> Option<RunPhase> {
        self.countdown.as_ref().map(Countdown::phase)
    }

    /// Whether ticks currently have an effect.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::InProgress && self.run_phase() == Some(RunPhase::Running)
    }

    /// The pending record, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&SessionRecord> {
        self.pending.as_ref()
    }

    /// The allowed durations.
    #[must_use]
    pub const fn allowed(&self) -> &AllowedDurations {
        &self.allowed
    }

    /// Render-ready state.
    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        let countdown = self.countdown.as_ref().filter(|_| self.phase == Phase::InProgress);
        FlowSnapshot {
            phase: self.phase,
            run_phase: countdown.map(Countdown::phase),
            remaining_seconds: countdown.map(Countdown::remaining_secs),
            duration_seconds: countdown.map(|c| c.duration().as_secs()),
            pending: self.pending.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn expect_phase(&self, expected: Phase, action: &str) -> Result<(), MindfulError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(MindfulError::invalid_state(format!(
                "cannot {action} while {}",
                self.phase
            )))
        }
    }

    fn active_countdown(&mut self, action: &str) -> Result<&mut Countdown, MindfulError> {
        self.expect_phase(Phase::InProgress, action)?;
        self.countdown
            .as_mut()
            .ok_or_else(|| MindfulError::invalid_state("no active countdown"))
    }
}

impl Default for SessionFlow {
    fn default() -> Self {
        Self::new(AllowedDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::meditation::record::parse_date;

    fn today() -> NaiveDate {
        parse_date("2026-10-16").unwrap()
    }

    fn minutes(n: u32) -> SessionDuration {
        SessionDuration::from_minutes(n).unwrap()
    }

    fn run_ticks(flow: &mut SessionFlow, n: u32) {
        for _ in 0..n {
            flow.tick(today());
        }
    }

    #[test]
    fn test_one_minute_session_records_one_minute() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(1)).unwrap();
        assert_eq!(flow.phase(), Phase::InProgress);

        run_ticks(&mut flow, 60);

        assert_eq!(flow.phase(), Phase::Reviewing);
        let record = flow.pending().unwrap();
        assert_eq!(record.duration_minutes, 1);
        assert_eq!(record.date, today());
        assert_eq!(record.note, None);
    }

    #[test]
    fn test_finished_event_fires_once() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(2)).unwrap();

        let finished = (0..200)
            .filter_map(|_| flow.tick(today()))
            .filter(|e| *e == CountdownEvent::Finished)
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn test_unlisted_duration_rejected_without_mutation() {
        let mut flow = SessionFlow::default();
        let err = flow
            .select_duration(SessionDuration::from_secs(45).unwrap())
            .unwrap_err();
        assert!(matches!(err, MindfulError::Validation(_)));
        assert_eq!(flow.phase(), Phase::Selecting);
        assert_eq!(flow.run_phase(), None);
    }

    #[test]
    fn test_select_while_in_progress_is_invalid_state() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(5)).unwrap();
        run_ticks(&mut flow, 3);

        let err = flow.select_duration(minutes(10)).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(flow.snapshot().remaining_seconds, Some(297));
    }

    #[test]
    fn test_stop_returns_to_selecting_without_record() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(2)).unwrap();
        run_ticks(&mut flow, 30);

        assert!(flow.stop().unwrap());
        assert_eq!(flow.phase(), Phase::Selecting);
        assert!(flow.pending().is_none());
        assert_eq!(flow.run_phase(), None);

        // Stopping again is harmless
        assert!(!flow.stop().unwrap());
        assert!(!flow.stop().unwrap());
    }

    #[test]
    fn test_back_from_paused_cancels() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(5)).unwrap();
        flow.pause().unwrap();
        assert!(flow.back().unwrap());
        assert_eq!(flow.phase(), Phase::Selecting);
    }

    #[test]
    fn test_pause_and_resume_through_flow() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(5)).unwrap();
        run_ticks(&mut flow, 50);
        flow.pause().unwrap();
        run_ticks(&mut flow, 10);
        assert_eq!(flow.snapshot().remaining_seconds, Some(250));
        assert_eq!(flow.snapshot().run_phase, Some(RunPhase::Paused));

        flow.resume().unwrap();
        run_ticks(&mut flow, 10);
        assert_eq!(flow.snapshot().remaining_seconds, Some(240));
    }

    #[test]
    fn test_reflection_only_while_reviewing() {
        let mut flow = SessionFlow::default();
        assert!(flow
            .update_reflection(Some("early"), "2026-10-16")
            .unwrap_err()
            .is_invalid_state());

        flow.select_duration(minutes(1)).unwrap();
        run_ticks(&mut flow, 60);

        flow.update_reflection(Some("quiet mind"), "2026-10-14").unwrap();
        let record = flow.pending().unwrap();
        assert_eq!(record.note.as_deref(), Some("quiet mind"));
        assert_eq!(record.date, parse_date("2026-10-14").unwrap());
    }

    #[test]
    fn test_failed_submission_keeps_record() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(1)).unwrap();
        run_ticks(&mut flow, 60);
        flow.update_reflection(Some("kept"), "2026-10-16").unwrap();

        let before = flow.pending_submission().unwrap().clone();
        flow.submission_failed(&PersistenceError::Unavailable("offline".to_string()));

        assert_eq!(flow.phase(), Phase::Reviewing);
        assert_eq!(flow.pending_submission().unwrap(), &before);
        assert!(flow.snapshot().last_error.unwrap().contains("offline"));

        flow.submission_succeeded();
        assert_eq!(flow.phase(), Phase::Selecting);
        assert!(flow.pending().is_none());
        assert!(flow.snapshot().last_error.is_none());
    }

    #[test]
    fn test_stop_while_reviewing_is_invalid() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(1)).unwrap();
        run_ticks(&mut flow, 60);
        assert!(flow.stop().unwrap_err().is_invalid_state());
        assert!(flow.pending().is_some());
    }

    #[test]
    fn test_discard_drops_record() {
        let mut flow = SessionFlow::default();
        flow.select_duration(minutes(1)).unwrap();
        run_ticks(&mut flow, 60);
        flow.discard().unwrap();
        assert_eq!(flow.phase(), Phase::Selecting);
        assert!(flow.pending().is_none());
        assert!(flow.discard().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_snapshot_progress() {
        let mut flow = SessionFlow::default();
        assert!(flow.snapshot().progress().abs() < f64::EPSILON);
        flow.select_duration(minutes(1)).unwrap();
        run_ticks(&mut flow, 30);
        assert!((flow.snapshot().progress() - 0.5).abs() < 0.01);
    }
}
