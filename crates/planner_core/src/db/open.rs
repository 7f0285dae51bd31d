//! Connection bootstrap for the planner database.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open attempt emits one `db_open` start event and one outcome event.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location reported for in-memory databases.
const MEMORY_LOCATION: &str = ":memory:";

/// Opens (or creates) a planner database file and applies pending migrations.
///
/// # Errors
/// - `DbError::Open` naming `path` when SQLite cannot open or create it.
/// - `DbError::NewerSchema` when the file comes from a newer planner.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(&path.display().to_string(), || Connection::open(path))
}

/// Opens an in-memory planner database, used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(MEMORY_LOCATION, Connection::open_in_memory)
}

fn open_with<F>(location: &str, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start location={location}");

    let result = connect()
        .map_err(|source| DbError::Open {
            location: location.to_string(),
            source,
        })
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            let version = apply_migrations(&mut conn)?;
            Ok((conn, version))
        });

    match result {
        Ok((conn, version)) => {
            info!(
                "event=db_open module=db status=ok location={location} schema_version={version} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            let error_code = match err {
                DbError::Open { .. } => "db_open_failed",
                DbError::NewerSchema { .. } => "db_schema_newer",
                DbError::Statement(_) => "db_bootstrap_failed",
            };
            error!(
                "event=db_open module=db status=error location={location} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}
