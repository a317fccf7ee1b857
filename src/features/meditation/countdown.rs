//! Countdown engine for a single meditation session.
//!
//! The engine is a plain state machine: it never reads the clock. Whoever owns
//! it calls [`Countdown::tick`] once per elapsed second while it is running.

use serde::{Deserialize, Serialize};

use super::duration::SessionDuration;
use crate::error::MindfulError;

/// Run phase of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    /// Armed with the full duration, not yet started.
    Idle,
    /// Counting down.
    Running,
    /// Frozen until resumed.
    Paused,
    /// Reached zero. Terminal until reset.
    Finished,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Notable transitions reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; carries the new remaining time.
    Ticked(u32),
    /// Remaining time reached zero. Reported once per countdown.
    Finished,
    /// Stopped before reaching zero and reset to the full duration.
    Cancelled,
}

/// A cancellable countdown with pause and resume.
///
/// `remaining == 0` holds exactly when the phase is `Finished`.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: SessionDuration,
    remaining: u32,
    phase: RunPhase,
}

impl Countdown {
    /// Create an idle countdown armed with `duration`.
    #[must_use]
    pub const fn new(duration: SessionDuration) -> Self {
        Self {
            duration,
            remaining: duration.as_secs(),
            phase: RunPhase::Idle,
        }
    }

    /// Start counting down.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless the countdown is idle.
    pub fn start(&mut self) -> Result<(), MindfulError> {
        if self.phase != RunPhase::Idle {
            return Err(MindfulError::invalid_state(format!(
                "cannot start a countdown that is {}",
                self.phase
            )));
        }
        self.remaining = self.duration.as_secs();
        self.phase = RunPhase::Running;
        Ok(())
    }

    /// Pause a running countdown, freezing the remaining time.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless the countdown is running.
    pub fn pause(&mut self) -> Result<(), MindfulError> {
        if self.phase != RunPhase::Running {
            return Err(MindfulError::invalid_state(format!(
                "cannot pause a countdown that is {}",
                self.phase
            )));
        }
        self.phase = RunPhase::Paused;
        Ok(())
    }

    /// Resume a paused countdown from its frozen value.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` unless the countdown is paused.
    pub fn resume(&mut self) -> Result<(), MindfulError> {
        if self.phase != RunPhase::Paused {
            return Err(MindfulError::invalid_state(format!(
                "cannot resume a countdown that is {}",
                self.phase
            )));
        }
        self.phase = RunPhase::Running;
        Ok(())
    }

    /// Stop and reset to the full duration.
    ///
    /// Returns `Some(Cancelled)` when a running or paused countdown was
    /// stopped, and `None` when it was already idle.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidState` for a finished countdown.
    pub fn stop(&mut self) -> Result<Option<CountdownEvent>, MindfulError> {
        match self.phase {
            RunPhase::Idle => Ok(None),
            RunPhase::Running | RunPhase::Paused => {
                self.remaining = self.duration.as_secs();
                self.phase = RunPhase::Idle;
                Ok(Some(CountdownEvent::Cancelled))
            }
            RunPhase::Finished => Err(MindfulError::invalid_state(
                "cannot stop a countdown that already finished",
            )),
        }
    }

    /// Apply one elapsed second.
    ///
    /// Ignored unless running, so a tick racing a pause or stop is a no-op.
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if self.phase != RunPhase::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = RunPhase::Finished;
            Some(CountdownEvent::Finished)
        } else {
            Some(CountdownEvent::Ticked(self.remaining))
        }
    }

    /// Re-arm a countdown to idle with its original duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration.as_secs();
        self.phase = RunPhase::Idle;
    }

    /// Current run phase.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    /// The duration this countdown was armed with.
    #[must_use]
    pub const fn duration(&self) -> SessionDuration {
        self.duration
    }

    /// Progress as a fraction (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.duration.as_secs());
        1.0 - f64::from(self.remaining) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::meditation::duration::AllowedDurations;

    fn secs(n: u32) -> SessionDuration {
        SessionDuration::from_secs(n).unwrap()
    }

    #[test]
    fn test_new_is_idle_with_full_time() {
        let countdown = Countdown::new(secs(120));
        assert_eq!(countdown.phase(), RunPhase::Idle);
        assert_eq!(countdown.remaining_secs(), 120);
    }

    #[test]
    fn test_every_allowed_duration_finishes_once() {
        for duration in AllowedDurations::default().as_slice() {
            let mut countdown = Countdown::new(*duration);
            countdown.start().unwrap();

            let mut finished = 0;
            for _ in 0..duration.as_secs() {
                if countdown.tick() == Some(CountdownEvent::Finished) {
                    finished += 1;
                }
            }

            // Extra ticks after finishing are ignored
            for _ in 0..5 {
                assert_eq!(countdown.tick(), None);
            }

            assert_eq!(finished, 1);
            assert_eq!(countdown.phase(), RunPhase::Finished);
            assert_eq!(countdown.remaining_secs(), 0);
        }
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut countdown = Countdown::new(secs(300));
        countdown.start().unwrap();
        for _ in 0..50 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining_secs(), 250);

        countdown.pause().unwrap();
        for _ in 0..10 {
            assert_eq!(countdown.tick(), None);
        }
        assert_eq!(countdown.remaining_secs(), 250);

        countdown.resume().unwrap();
        for _ in 0..10 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining_secs(), 240);
    }

    #[test]
    fn test_stop_resets_to_full_duration() {
        let mut countdown = Countdown::new(secs(120));
        countdown.start().unwrap();
        for _ in 0..30 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining_secs(), 90);

        assert_eq!(countdown.stop().unwrap(), Some(CountdownEvent::Cancelled));
        assert_eq!(countdown.phase(), RunPhase::Idle);
        assert_eq!(countdown.remaining_secs(), 120);
    }

    #[test]
    fn test_stop_from_paused() {
        let mut countdown = Countdown::new(secs(60));
        countdown.start().unwrap();
        countdown.tick();
        countdown.pause().unwrap();
        assert_eq!(countdown.stop().unwrap(), Some(CountdownEvent::Cancelled));
        assert_eq!(countdown.remaining_secs(), 60);
    }

    #[test]
    fn test_stop_twice_from_idle_is_noop() {
        let mut countdown = Countdown::new(secs(60));
        assert_eq!(countdown.stop().unwrap(), None);
        assert_eq!(countdown.stop().unwrap(), None);
        assert_eq!(countdown.phase(), RunPhase::Idle);
        assert_eq!(countdown.remaining_secs(), 60);
    }

    #[test]
    fn test_invalid_transitions_leave_state_untouched() {
        let mut countdown = Countdown::new(secs(60));
        assert!(countdown.pause().unwrap_err().is_invalid_state());
        assert!(countdown.resume().unwrap_err().is_invalid_state());

        countdown.start().unwrap();
        assert!(countdown.start().unwrap_err().is_invalid_state());
        assert!(countdown.resume().unwrap_err().is_invalid_state());
        assert_eq!(countdown.phase(), RunPhase::Running);
        assert_eq!(countdown.remaining_secs(), 60);
    }

    #[test]
    fn test_finished_is_terminal_until_reset() {
        let mut countdown = Countdown::new(secs(2));
        countdown.start().unwrap();
        countdown.tick();
        assert_eq!(countdown.tick(), Some(CountdownEvent::Finished));

        assert!(countdown.start().is_err());
        assert!(countdown.pause().is_err());
        assert!(countdown.stop().is_err());
        assert_eq!(countdown.phase(), RunPhase::Finished);

        countdown.reset();
        assert_eq!(countdown.phase(), RunPhase::Idle);
        assert_eq!(countdown.remaining_secs(), 2);
        countdown.start().unwrap();
    }

    #[test]
    fn test_progress() {
        let mut countdown = Countdown::new(secs(100));
        countdown.start().unwrap();
        assert!(countdown.progress().abs() < f64::EPSILON);
        for _ in 0..50 {
            countdown.tick();
        }
        assert!((countdown.progress() - 0.5).abs() < 0.01);
    }
}
