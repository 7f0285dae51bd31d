//! Availability sheet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose one sheet of raw `{participant, date}` rows to the store.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Reads return rows in insertion (`row_id`) order, unvalidated.
//! - `replace_rows` swaps the whole sheet inside one transaction.
//! - Columns other than participant/date are ignored on read.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use log::{debug, error};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors reported by a persistence collaborator.
#[derive(Debug)]
pub enum RepoError {
    /// Database could not be opened, migrated or queried.
    Db(DbError),
    /// Sheet name is blank.
    InvalidSheet(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Backend cannot be reached; reads and writes are not attempted.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSheet(value) => write!(f, "invalid sheet name: `{value}`"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::Unavailable(message) => write!(f, "availability backend unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Statement(value))
    }
}

/// One raw sheet row as stored by the collaborator.
///
/// Both cells are optional: rows edited outside the planner may be partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub participant: Option<String>,
    pub date: Option<String>,
}

impl AvailabilityRow {
    /// Builds a complete row.
    pub fn new(participant: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            participant: Some(participant.into()),
            date: Some(date.into()),
        }
    }
}

/// Persistence collaborator for one availability sheet.
pub trait AvailabilityRepository {
    /// Reads every row of the sheet in stored order.
    fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>>;
    /// Replaces the sheet content with `rows`, all or nothing.
    fn replace_rows(&self, rows: &[AvailabilityRow]) -> RepoResult<()>;
}

impl<R: AvailabilityRepository + ?Sized> AvailabilityRepository for &R {
    fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>> {
        (**self).read_rows()
    }

    fn replace_rows(&self, rows: &[AvailabilityRow]) -> RepoResult<()> {
        (**self).replace_rows(rows)
    }
}

/// SQLite-backed sheet repository bound to one sheet name.
pub struct SqliteAvailabilityRepository<'conn> {
    conn: &'conn Connection,
    sheet: String,
}

impl<'conn> SqliteAvailabilityRepository<'conn> {
    /// Binds `sheet` on a migrated connection.
    ///
    /// # Errors
    /// - `InvalidSheet` when `sheet` is blank.
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection, sheet: &str) -> RepoResult<Self> {
        let sheet = sheet.trim();
        if sheet.is_empty() {
            return Err(RepoError::InvalidSheet(sheet.to_string()));
        }

        let actual_version = schema_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        Ok(Self {
            conn,
            sheet: sheet.to_string(),
        })
    }

    pub fn sheet(&self) -> &str {
        self.sheet.as_str()
    }
}

impl AvailabilityRepository for SqliteAvailabilityRepository<'_> {
    fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT participant, date
             FROM availability_rows
             WHERE sheet = ?1
             ORDER BY row_id ASC;",
        )?;

        let rows = stmt
            .query_map([self.sheet.as_str()], |row| {
                Ok(AvailabilityRow {
                    participant: row.get("participant")?,
                    date: row.get("date")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "event=sheet_read module=repo status=ok sheet={} rows={}",
            self.sheet,
            rows.len()
        );
        Ok(rows)
    }

    fn replace_rows(&self, rows: &[AvailabilityRow]) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = (|| -> RepoResult<()> {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute(
                "DELETE FROM availability_rows WHERE sheet = ?1;",
                [self.sheet.as_str()],
            )?;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO availability_rows (sheet, participant, date)
                     VALUES (?1, ?2, ?3);",
                )?;
                for row in rows {
                    insert.execute(params![
                        self.sheet.as_str(),
                        row.participant.as_deref(),
                        row.date.as_deref(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })();

        match &result {
            Ok(()) => debug!(
                "event=sheet_write module=repo status=ok sheet={} rows={} duration_ms={}",
                self.sheet,
                rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=sheet_write module=repo status=error sheet={} rows={} error={err}",
                self.sheet,
                rows.len()
            ),
        }
        result
    }
}
