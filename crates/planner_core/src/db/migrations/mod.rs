//! Planner schema migrations.
//!
//! Each step is an embedded SQL file; the database records the last applied
//! step in `PRAGMA user_version`.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - Pending steps commit together or not at all.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "availability_rows",
    sql: include_str!("0001_availability_rows.sql"),
}];

/// Schema version this planner writes and expects.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version stored on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn pending_steps(found: u32) -> DbResult<&'static [SchemaStep]> {
    let supported = latest_version();
    if found > supported {
        return Err(DbError::NewerSchema { found, supported });
    }
    let applied = SCHEMA_STEPS
        .iter()
        .take_while(|step| step.version <= found)
        .count();
    Ok(&SCHEMA_STEPS[applied..])
}

/// Brings `conn` up to [`latest_version`] and returns the resulting version.
///
/// # Errors
/// - `DbError::NewerSchema` when the stored version is ahead of this planner.
/// - `DbError::Statement` when a step fails; nothing is committed then.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = schema_version(conn)?;
    let pending = pending_steps(found)?;
    let Some(last) = pending.last() else {
        return Ok(found);
    };

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={}",
        last.version
    );
    Ok(last.version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending_steps, SCHEMA_STEPS};
    use crate::db::DbError;

    #[test]
    fn step_versions_are_contiguous_from_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn pending_steps_follow_the_stored_version() {
        assert_eq!(pending_steps(0).unwrap().len(), SCHEMA_STEPS.len());
        assert!(pending_steps(latest_version()).unwrap().is_empty());
        assert!(matches!(
            pending_steps(latest_version() + 1).unwrap_err(),
            DbError::NewerSchema { found, .. } if found == latest_version() + 1
        ));
    }
}
