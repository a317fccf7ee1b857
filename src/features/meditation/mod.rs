//! Guided meditation sessions.
//!
//! A session moves through three screens:
//! - pick a duration from the allowed set
//! - sit through a one-second countdown that can be paused or stopped
//! - review the finished session and save it to the journal
//!
//! `Countdown` and `SessionFlow` are plain state machines. `SessionController`
//! drives them on the tokio runtime and talks to the journal.

pub mod controller;
pub mod countdown;
pub mod duration;
pub mod flow;
pub mod journal;
pub mod record;
pub mod report;
pub mod ticker;

pub use controller::{Chime, SessionController, SilentChime, TerminalBell};
pub use countdown::{Countdown, CountdownEvent, RunPhase};
pub use duration::{
    format_duration, format_mmss, parse_duration, AllowedDurations, SessionDuration,
};
pub use flow::{FlowSnapshot, Phase, SessionFlow};
pub use journal::{
    AuthContext, JournalEntry, JournalService, NoopTerminator, SessionTerminator, SqliteJournal,
};
pub use record::{parse_date, SessionRecord};
pub use report::{MeditationReport, ReportPeriod};
