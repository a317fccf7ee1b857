//! Journal service: where finished sessions are stored.
//!
//! The session controller only sees [`JournalService`]. The default
//! implementation keeps entries in the local SQLite database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
#[cfg(test)]
use mockall::automock;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::record::{parse_date, SessionRecord};
use crate::error::{MindfulError, PersistenceError};
use crate::storage::Database;

/// Who is submitting, passed explicitly to every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Signed-in user name.
    pub user: String,
    /// When the sign-in stops being valid.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthContext {
    /// Create a context for `user` with an optional expiry.
    #[must_use]
    pub fn new(user: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            user: user.into(),
            expires_at,
        }
    }

    /// Whether the sign-in has lapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Accepts finished session records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JournalService: Send + Sync {
    /// Store one finished session for the user in `auth`.
    async fn submit_session(
        &self,
        auth: &AuthContext,
        record: &SessionRecord,
    ) -> Result<(), PersistenceError>;
}

/// Ends the user's sign-in after an authorization failure.
#[cfg_attr(test, automock)]
pub trait SessionTerminator: Send + Sync {
    /// Sign the user out.
    fn terminate(&self, reason: &str);
}

/// A terminator that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTerminator;

impl SessionTerminator for NoopTerminator {
    fn terminate(&self, reason: &str) {
        debug!(reason, "sign-out requested with no credential store attached");
    }
}

/// A stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Database ID.
    pub id: i64,
    /// User the entry belongs to.
    pub user: String,
    /// Session length in minutes.
    pub duration_minutes: u32,
    /// Session date.
    pub date: NaiveDate,
    /// Reflection note.
    pub note: Option<String>,
    /// When the entry was stored.
    pub created_at: DateTime<Utc>,
}

/// Journal backed by the local SQLite database.
pub struct SqliteJournal {
    db: Mutex<Database>,
}

impl SqliteJournal {
    /// Open the journal at the default database location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, MindfulError> {
        Ok(Self::with_database(Database::open()?))
    }

    /// Create a journal over an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Insert a record for `user` and return the stored entry.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Validation` for a zero-minute record and
    /// `MindfulError::Database` if the insert fails.
    pub fn insert(&self, user: &str, record: &SessionRecord) -> Result<JournalEntry, MindfulError> {
        if record.duration_minutes == 0 {
            return Err(MindfulError::validation("duration must be at least one minute"));
        }

        let created_at = Utc::now();
        let db = self.lock()?;
        let conn = db.connection();

        conn.execute(
            r"INSERT INTO journal_entries (user, duration_minutes, date, note, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user,
                record.duration_minutes,
                record.date.to_string(),
                record.note,
                created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| MindfulError::Database(format!("Failed to insert entry: {e}")))?;

        Ok(JournalEntry {
            id: conn.last_insert_rowid(),
            user: user.to_string(),
            duration_minutes: record.duration_minutes,
            date: record.date,
            note: record.note.clone(),
            created_at,
        })
    }

    /// Get an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<JournalEntry>, MindfulError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare(&format!("{SELECT_ENTRY} WHERE id = ?1"))
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([id], row_to_entry)
            .optional()
            .map_err(|e| MindfulError::Database(format!("Failed to query entry: {e}")))
    }

    /// Most recent entries, newest date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>, MindfulError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare(&format!(
                "{SELECT_ENTRY} ORDER BY date DESC, created_at DESC LIMIT ?1"
            ))
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([limit], row_to_entry)
            .map_err(|e| MindfulError::Database(format!("Failed to query entries: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MindfulError::Database(e.to_string()))
    }

    /// Entries dated within `start..=end`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, MindfulError> {
        let db = self.lock()?;
        let mut stmt = db
            .connection()
            .prepare(&format!(
                "{SELECT_ENTRY} WHERE date >= ?1 AND date <= ?2 ORDER BY date DESC, created_at DESC"
            ))
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([start.to_string(), end.to_string()], row_to_entry)
            .map_err(|e| MindfulError::Database(format!("Failed to query entries: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MindfulError::Database(e.to_string()))
    }

    /// Total minutes across all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn total_minutes(&self) -> Result<i64, MindfulError> {
        let db = self.lock()?;
        db.connection()
            .query_row(
                "SELECT COALESCE(SUM(duration_minutes), 0) FROM journal_entries",
                [],
                |row| row.get(0),
            )
            .map_err(|e| MindfulError::Database(format!("Failed to sum entries: {e}")))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Database>, MindfulError> {
        self.db
            .lock()
            .map_err(|_| MindfulError::Database("journal lock poisoned".to_string()))
    }
}

#[async_trait]
impl JournalService for SqliteJournal {
    async fn submit_session(
        &self,
        auth: &AuthContext,
        record: &SessionRecord,
    ) -> Result<(), PersistenceError> {
        if auth.is_expired_at(Utc::now()) {
            warn!(user = %auth.user, "rejecting submission from expired sign-in");
            return Err(PersistenceError::Unauthorized);
        }

        match self.insert(&auth.user, record) {
            Ok(entry) => {
                debug!(id = entry.id, user = %entry.user, "journal entry stored");
                Ok(())
            }
            Err(MindfulError::Validation(msg)) => Err(PersistenceError::Rejected(msg)),
            Err(e) => Err(PersistenceError::Unavailable(e.to_string())),
        }
    }
}

const SELECT_ENTRY: &str =
    "SELECT id, user, duration_minutes, date, note, created_at FROM journal_entries";

/// Convert a database row to an entry.
fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let date: String = row.get(3)?;
    let created_at: String = row.get(5)?;

    let date = parse_date(&date).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(JournalEntry {
        id: row.get(0)?,
        user: row.get(1)?,
        duration_minutes: row.get(2)?,
        date,
        note: row.get(4)?,
        created_at,
    })
}
