//! Availability aggregation: presence matrix and common days.
//!
//! # Responsibility
//! - Pivot an `AvailabilitySet` into one row per day with one presence flag
//!   per participant.
//! - Select the days on which everybody is available.
//!
//! # Invariants
//! - Pure and deterministic; the input set is never modified.
//! - A day appears only if at least one listed participant marked it.
//! - Rows are ordered by `total DESC, date ASC`.
//! - `0 < total <= participants.len()` for every row.

use crate::model::availability::{AvailabilitySet, CalendarDate};
use crate::model::participant::ParticipantId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One day of the pivoted availability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub date: CalendarDate,
    /// Presence flags aligned with `SummaryTable::participants`.
    pub presence: Vec<bool>,
    /// Number of `true` flags in `presence`.
    pub total: usize,
}

/// Pivoted availability table, pre-sorted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    participants: Vec<ParticipantId>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Column order of every `presence` vector.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row for `date`, if any participant marked it.
    pub fn row_for(&self, date: CalendarDate) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.date == date)
    }

    /// Presence of `participant` on `date`; `false` for unknown days/columns.
    pub fn is_present(&self, date: CalendarDate, participant: &ParticipantId) -> bool {
        let Some(column) = self.participants.iter().position(|p| p == participant) else {
            return false;
        };
        self.row_for(date)
            .is_some_and(|row| row.presence.get(column).copied().unwrap_or(false))
    }
}

/// Pivots `set` into a per-day presence table over `participants`.
///
/// Records of participants missing from `participants` are ignored, so they
/// can neither add a column nor create a zero-total row. When a participant
/// is listed twice, only its first column is filled.
pub fn summarize(set: &AvailabilitySet, participants: &[ParticipantId]) -> SummaryTable {
    let mut by_date: BTreeMap<CalendarDate, Vec<bool>> = BTreeMap::new();
    for record in set {
        let Some(column) = participants.iter().position(|p| p == &record.participant) else {
            continue;
        };
        by_date
            .entry(record.date)
            .or_insert_with(|| vec![false; participants.len()])[column] = true;
    }

    let mut rows: Vec<SummaryRow> = by_date
        .into_iter()
        .map(|(date, presence)| {
            let total = presence.iter().filter(|present| **present).count();
            SummaryRow {
                date,
                presence,
                total,
            }
        })
        .collect();
    rows.sort_by(|left, right| {
        right
            .total
            .cmp(&left.total)
            .then_with(|| left.date.cmp(&right.date))
    });

    SummaryTable {
        participants: participants.to_vec(),
        rows,
    }
}

/// Days on which all `participant_count` participants are available.
pub fn common_days(table: &SummaryTable, participant_count: usize) -> BTreeSet<CalendarDate> {
    table
        .rows
        .iter()
        .filter(|row| row.total == participant_count)
        .map(|row| row.date)
        .collect()
}
