//! Availability store: load, toggle, persist and clear.
//!
//! # Responsibility
//! - Decode raw sheet rows into a validated `AvailabilitySet`.
//! - Provide the pure toggle transition and whole-set write-back.
//!
//! # Invariants
//! - `load` never fails its caller; an unreachable backend yields an empty set
//!   plus a `PersistenceUnavailable` warning.
//! - Malformed rows are dropped on load and reported, never raised.
//! - `persist`/`clear` are the only writes and replace the whole sheet.
//! - No retries happen here; retry policy belongs to the repository.

use crate::model::availability::{
    format_date, parse_date_cell, AvailabilityRecord, AvailabilitySet, CalendarDate,
};
use crate::model::participant::{ParticipantId, ParticipantRoster};
use crate::repo::availability_repo::{AvailabilityRepository, AvailabilityRow, RepoError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Store-level persistence failures.
#[derive(Debug)]
pub enum StoreError {
    /// Backend unreachable while loading; the caller got an empty set.
    PersistenceUnavailable(RepoError),
    /// Write-back failed; the stored sheet keeps its previous content.
    PersistenceError(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersistenceUnavailable(err) => write!(f, "availability data unavailable: {err}"),
            Self::PersistenceError(err) => write!(f, "failed to save availability: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PersistenceUnavailable(err) | Self::PersistenceError(err) => Some(err),
        }
    }
}

/// Why a sheet row was dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingParticipant,
    MissingDate,
    UnknownParticipant(String),
    InvalidDate(String),
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParticipant => write!(f, "missing participant"),
            Self::MissingDate => write!(f, "missing date"),
            Self::UnknownParticipant(name) => write!(f, "unknown participant `{name}`"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`"),
        }
    }
}

/// A sheet row dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Zero-based position in the rows returned by the repository.
    pub row_index: usize,
    pub reason: MalformedReason,
}

/// Result of `AvailabilityStore::load`.
#[derive(Debug)]
pub struct LoadOutcome {
    pub set: AvailabilitySet,
    /// Rows skipped while decoding, in sheet order.
    pub dropped: Vec<MalformedRecord>,
    /// `Some(StoreError::PersistenceUnavailable)` when the backend failed.
    pub warning: Option<StoreError>,
}

impl LoadOutcome {
    /// Whether the set reflects stored data rather than an empty fallback.
    pub fn is_available(&self) -> bool {
        self.warning.is_none()
    }
}

/// Owner of the canonical availability records for one sheet.
pub struct AvailabilityStore<R: AvailabilityRepository> {
    repo: R,
    roster: ParticipantRoster,
}

impl<R: AvailabilityRepository> AvailabilityStore<R> {
    pub fn new(repo: R, roster: ParticipantRoster) -> Self {
        Self { repo, roster }
    }

    pub fn roster(&self) -> &ParticipantRoster {
        &self.roster
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Reads and decodes the whole sheet.
    ///
    /// # Side effects
    /// - One repository read.
    /// - Emits `availability_load` events; dropped rows are logged at debug.
    pub fn load(&self) -> LoadOutcome {
        let started_at = Instant::now();
        let rows = match self.repo.read_rows() {
            Ok(rows) => rows,
            Err(err) => {
                warn!(
                    "event=availability_load module=store status=degraded duration_ms={} error_code=persistence_unavailable error={err}",
                    started_at.elapsed().as_millis()
                );
                return LoadOutcome {
                    set: AvailabilitySet::new(),
                    dropped: Vec::new(),
                    warning: Some(StoreError::PersistenceUnavailable(err)),
                };
            }
        };

        let mut records = Vec::with_capacity(rows.len());
        let mut dropped = Vec::new();
        for (row_index, row) in rows.iter().enumerate() {
            match decode_row(&self.roster, row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!(
                        "event=availability_row_dropped module=store row_index={row_index} reason={reason}"
                    );
                    dropped.push(MalformedRecord { row_index, reason });
                }
            }
        }

        let decoded = records.len();
        let set: AvailabilitySet = records.into_iter().collect();
        info!(
            "event=availability_load module=store status=ok duration_ms={} rows={} records={} dropped={} duplicates={}",
            started_at.elapsed().as_millis(),
            rows.len(),
            set.len(),
            dropped.len(),
            decoded - set.len()
        );

        LoadOutcome {
            set,
            dropped,
            warning: None,
        }
    }

    /// Returns `set` with the (participant, date) presence flipped.
    ///
    /// In-memory only; persisting the result is the caller's decision.
    pub fn toggle(
        &self,
        set: &AvailabilitySet,
        participant: &ParticipantId,
        date: CalendarDate,
    ) -> AvailabilitySet {
        set.toggled(participant, date)
    }

    /// Replaces the stored sheet with `set` (last writer wins).
    pub fn persist(&self, set: &AvailabilitySet) -> Result<(), StoreError> {
        let rows: Vec<AvailabilityRow> = set
            .iter()
            .map(|record| {
                AvailabilityRow::new(record.participant.as_str(), format_date(record.date))
            })
            .collect();

        match self.repo.replace_rows(&rows) {
            Ok(()) => {
                info!(
                    "event=availability_persist module=store status=ok records={}",
                    rows.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=availability_persist module=store status=error records={} error_code=persist_failed error={err}",
                    rows.len()
                );
                Err(StoreError::PersistenceError(err))
            }
        }
    }

    /// Replaces the stored sheet with the empty set.
    pub fn clear(&self) -> Result<(), StoreError> {
        info!("event=availability_clear module=store status=start");
        self.persist(&AvailabilitySet::new())
    }
}

fn decode_row(
    roster: &ParticipantRoster,
    row: &AvailabilityRow,
) -> Result<AvailabilityRecord, MalformedReason> {
    let participant_cell =
        non_blank(row.participant.as_deref()).ok_or(MalformedReason::MissingParticipant)?;
    let date_cell = non_blank(row.date.as_deref()).ok_or(MalformedReason::MissingDate)?;

    let participant = roster
        .resolve(participant_cell)
        .ok_or_else(|| MalformedReason::UnknownParticipant(participant_cell.to_string()))?;
    let date = parse_date_cell(date_cell)
        .ok_or_else(|| MalformedReason::InvalidDate(date_cell.to_string()))?;

    Ok(AvailabilityRecord::new(participant.clone(), date))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
