//! mindful - A terminal meditation timer
//!
//! This crate runs guided meditation sessions: pick a length, sit through a
//! one-second countdown that can be paused or stopped, then record a short
//! reflection in a local journal.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::{MindfulError, PersistenceError};
pub use features::meditation::{SessionController, SessionFlow};
