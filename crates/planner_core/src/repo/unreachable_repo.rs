//! Stand-in collaborator for a backend that could not be reached.
//!
//! # Invariants
//! - Every read and write fails with `RepoError::Unavailable` carrying the
//!   original failure text, so the store degrades instead of aborting.

use crate::db::DbError;
use crate::repo::availability_repo::{
    AvailabilityRepository, AvailabilityRow, RepoError, RepoResult,
};
use log::warn;

/// Repository used when the sheet backend failed to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreachableRepository {
    reason: String,
}

impl UnreachableRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    fn unavailable(&self, op: &str) -> RepoError {
        warn!(
            "event=repo_{op} module=repo status=skipped error_code=backend_unreachable error={}",
            self.reason
        );
        RepoError::Unavailable(self.reason.clone())
    }
}

impl From<&DbError> for UnreachableRepository {
    fn from(value: &DbError) -> Self {
        Self::new(value.to_string())
    }
}

impl From<&RepoError> for UnreachableRepository {
    fn from(value: &RepoError) -> Self {
        Self::new(value.to_string())
    }
}

impl AvailabilityRepository for UnreachableRepository {
    fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>> {
        Err(self.unavailable("read"))
    }

    fn replace_rows(&self, _rows: &[AvailabilityRow]) -> RepoResult<()> {
        Err(self.unavailable("replace"))
    }
}
