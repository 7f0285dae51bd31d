//! SQLite storage bootstrap for availability sheets.
//!
//! # Responsibility
//! - Open the planner database file and bring its schema up to date.
//! - Report which database failed, so callers never rebuild that context.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer planner is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while reaching or preparing the planner database.
#[derive(Debug)]
pub enum DbError {
    /// The database at `location` could not be opened or created.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A statement failed on an open connection.
    Statement(rusqlite::Error),
    /// The stored schema was written by a newer planner.
    NewerSchema { found: u32, supported: u32 },
}

impl DbError {
    /// Location of the database that failed to open, if that was the failure.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Open { location, .. } => Some(location.as_str()),
            _ => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open planner database `{location}`: {source}")
            }
            Self::Statement(err) => write!(f, "planner database statement failed: {err}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "planner database schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Statement(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Statement(value)
    }
}
