//! Storage layer for mindful.
//!
//! SQLite-based persistence for the meditation journal.

mod database;
mod migrations;

pub use database::Database;
