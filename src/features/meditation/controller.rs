//! Async driver for the session flow.
//!
//! The controller owns the flow and its ticker behind one lock. Every tick and
//! every user intent takes that lock, so a pause and a tick arriving together
//! are applied one after the other and the later one hits the phase guard.

use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::countdown::CountdownEvent;
use super::duration::SessionDuration;
use super::flow::{FlowSnapshot, SessionFlow};
use super::journal::{AuthContext, JournalService, NoopTerminator, SessionTerminator};
use super::ticker::Ticker;
use crate::error::MindfulError;

/// Signals the end of a session to the user.
pub trait Chime: Send + Sync {
    /// Play the cue. Called once per finished countdown.
    fn ring(&self);
}

/// Rings the terminal bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn ring(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            debug!(error = %e, "failed to ring terminal bell");
        }
    }
}

/// A chime that stays quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn ring(&self) {}
}

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

struct Inner {
    flow: SessionFlow,
    ticker: Ticker,
}

/// Runs meditation sessions against a journal service.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Mutex<Inner>>,
    journal: Arc<dyn JournalService>,
    terminator: Arc<dyn SessionTerminator>,
    chime: Arc<dyn Chime>,
    updates: Arc<watch::Sender<FlowSnapshot>>,
    tick_interval: Duration,
    today: Clock,
}

impl SessionController {
    /// Create a controller in the selecting phase.
    #[must_use]
    pub fn new(flow: SessionFlow, journal: Arc<dyn JournalService>) -> Self {
        let (updates, _) = watch::channel(flow.snapshot());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                flow,
                ticker: Ticker::new(),
            })),
            journal,
            terminator: Arc::new(NoopTerminator),
            chime: Arc::new(SilentChime),
            updates: Arc::new(updates),
            tick_interval: Duration::from_secs(1),
            today: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Use `chime` for the end-of-session cue.
    #[must_use]
    pub fn with_chime(mut self, chime: Arc<dyn Chime>) -> Self {
        self.chime = chime;
        self
    }

    /// Use `terminator` to sign the user out after an authorization failure.
    #[must_use]
    pub fn with_terminator(mut self, terminator: Arc<dyn SessionTerminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Use `today` to date finished sessions.
    #[must_use]
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        self.updates.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.updates.subscribe()
    }

    /// Start a session of `duration`.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` if the duration is not allowed.
    pub async fn select_duration(&self, duration: SessionDuration) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        if settle(inner.flow.select_duration(duration))?.is_some() {
            self.spawn_ticker(&mut inner);
        }
        self.publish(&inner.flow);
        Ok(())
    }

    /// Pause the running countdown.
    ///
    /// # Errors
    ///
    /// Phase-guard rejections are logged and ignored, so this currently
    /// always succeeds.
    pub async fn pause(&self) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        if settle(inner.flow.pause())?.is_some() {
            inner.ticker.cancel();
            info!("session paused");
        }
        self.publish(&inner.flow);
        Ok(())
    }

    /// Resume the paused countdown.
    ///
    /// # Errors
    ///
    /// Phase-guard rejections are logged and ignored, so this currently
    /// always succeeds.
    pub async fn resume(&self) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        if settle(inner.flow.resume())?.is_some() {
            self.spawn_ticker(&mut inner);
            info!("session resumed");
        }
        self.publish(&inner.flow);
        Ok(())
    }

    /// Stop the countdown and go back to selection.
    ///
    /// # Errors
    ///
    /// Phase-guard rejections are logged and ignored, so this currently
    /// always succeeds.
    pub async fn stop(&self) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        if settle(inner.flow.stop())? == Some(true) {
            inner.ticker.cancel();
        }
        self.publish(&inner.flow);
        Ok(())
    }

    /// Leave the countdown screen; same as [`Self::stop`].
    ///
    /// # Errors
    ///
    /// Phase-guard rejections are logged and ignored, so this currently
    /// always succeeds.
    pub async fn back(&self) -> Result<(), MindfulError> {
        self.stop().await
    }

    /// Edit the pending reflection.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` for a malformed date.
    pub async fn update_reflection(
        &self,
        note: Option<&str>,
        date: &str,
    ) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        settle(inner.flow.update_reflection(note, date))?;
        self.publish(&inner.flow);
        Ok(())
    }

    /// Send the pending record to the journal.
    ///
    /// The lock is held across the submission, so dropping this future midway
    /// leaves the pending record exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Persistence` if the journal refuses the record.
    /// The record stays pending for a retry.
    pub async fn submit(&self, auth: &AuthContext) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        let Some(record) = settle(inner.flow.pending_submission().cloned())? else {
            return Ok(());
        };

        match self.journal.submit_session(auth, &record).await {
            Ok(()) => {
                inner.flow.submission_succeeded();
                self.publish(&inner.flow);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session submission failed");
                inner.flow.submission_failed(&err);
                if err.is_unauthorized() {
                    self.terminator.terminate(&err.to_string());
                }
                self.publish(&inner.flow);
                Err(err.into())
            }
        }
    }

    /// Drop the unsaved record and go back to selection.
    ///
    /// # Errors
    ///
    /// Phase-guard rejections are logged and ignored, so this currently
    /// always succeeds.
    pub async fn discard(&self) -> Result<(), MindfulError> {
        let mut inner = self.inner.lock().await;
        settle(inner.flow.discard())?;
        self.publish(&inner.flow);
        Ok(())
    }

    fn spawn_ticker(&self, inner: &mut Inner) {
        let shared = Arc::downgrade(&self.inner);
        let updates = self.updates.clone();
        let chime = self.chime.clone();
        let today = self.today.clone();

        inner.ticker.spawn(self.tick_interval, move || {
            let shared = shared.clone();
            let updates = updates.clone();
            let chime = chime.clone();
            let today = today.clone();
            async move {
                // Controller dropped: nothing left to drive
                let Some(shared) = shared.upgrade() else {
                    return ControlFlow::Break(());
                };
                let mut guard = shared.lock().await;
                let event = guard.flow.tick(today());
                if event.is_some() {
                    updates.send_replace(guard.flow.snapshot());
                }
                if event == Some(CountdownEvent::Finished) {
                    chime.ring();
                }
                if guard.flow.is_running() {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            }
        });
    }

    fn publish(&self, flow: &SessionFlow) {
        self.updates.send_replace(flow.snapshot());
    }
}

/// Swallow phase-guard rejections; pass everything else through.
fn settle<T>(result: Result<T, MindfulError>) -> Result<Option<T>, MindfulError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MindfulError::InvalidState(msg)) => {
            debug!(reason = %msg, "ignoring intent");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
