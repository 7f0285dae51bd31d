//! Availability record and set model.
//!
//! # Responsibility
//! - Define the (participant, date) claim and the set that owns them.
//! - Provide the pure toggle transition used by every interaction cycle.
//! - Normalize sheet date cells to calendar days.
//!
//! # Invariants
//! - Record identity is the (participant, date) pair; no counts, no duplicates.
//! - `toggled` never mutates its receiver; it returns a new set.
//! - Iteration order is `date ASC, participant ASC`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::btree_set;
use std::collections::BTreeSet;

use crate::model::participant::ParticipantId;

/// Calendar day without time component.
pub type CalendarDate = NaiveDate;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// Sheet cells written by spreadsheet tools often carry a midnight timestamp.
static DATE_CELL_RE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?$")
        .expect("valid date cell regex")
});

/// Parses a sheet/CLI date cell into a calendar day.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a `T` or space separated
/// time which is discarded. Returns `None` for anything else.
pub fn parse_date_cell(value: &str) -> Option<CalendarDate> {
    let captures = DATE_CELL_RE.captures(value.trim())?;
    NaiveDate::parse_from_str(captures.get(1)?.as_str(), ISO_DATE_FORMAT).ok()
}

/// Formats a calendar day the way it is stored in sheets.
pub fn format_date(date: CalendarDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// A claim that one participant is available on one day.
///
/// Field order drives `Ord`: records sort by day first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AvailabilityRecord {
    pub date: CalendarDate,
    pub participant: ParticipantId,
}

impl AvailabilityRecord {
    pub fn new(participant: ParticipantId, date: CalendarDate) -> Self {
        Self { date, participant }
    }
}

/// Full collection of availability records for every participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailabilitySet {
    records: BTreeSet<AvailabilityRecord>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether `participant` is marked available on `date`.
    pub fn contains(&self, participant: &ParticipantId, date: CalendarDate) -> bool {
        self.records
            .contains(&AvailabilityRecord::new(participant.clone(), date))
    }

    /// Records in `date ASC, participant ASC` order.
    pub fn iter(&self) -> btree_set::Iter<'_, AvailabilityRecord> {
        self.records.iter()
    }

    /// Returns a new set with the pair's presence flipped.
    ///
    /// # Invariants
    /// - Exactly one of insert/remove happens.
    /// - `s.toggled(p, d).toggled(p, d) == s`.
    pub fn toggled(&self, participant: &ParticipantId, date: CalendarDate) -> Self {
        let record = AvailabilityRecord::new(participant.clone(), date);
        let mut records = self.records.clone();
        if !records.remove(&record) {
            records.insert(record);
        }
        Self { records }
    }

    /// Days on which `participant` is marked available, ascending.
    pub fn dates_for(&self, participant: &ParticipantId) -> BTreeSet<CalendarDate> {
        self.records
            .iter()
            .filter(|record| &record.participant == participant)
            .map(|record| record.date)
            .collect()
    }
}

impl FromIterator<AvailabilityRecord> for AvailabilitySet {
    fn from_iter<T: IntoIterator<Item = AvailabilityRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AvailabilitySet {
    type Item = &'a AvailabilityRecord;
    type IntoIter = btree_set::Iter<'a, AvailabilityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_date_cell, AvailabilityRecord, AvailabilitySet};
    use crate::model::participant::ParticipantRoster;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parse_date_cell_accepts_plain_and_timestamped_cells() {
        assert_eq!(parse_date_cell("2024-05-01"), Some(day("2024-05-01")));
        assert_eq!(parse_date_cell(" 2024-05-01 "), Some(day("2024-05-01")));
        assert_eq!(
            parse_date_cell("2024-05-01 00:00:00"),
            Some(day("2024-05-01"))
        );
        assert_eq!(
            parse_date_cell("2024-05-01T09:30:00.000"),
            Some(day("2024-05-01"))
        );
    }

    #[test]
    fn parse_date_cell_rejects_garbage_and_impossible_days() {
        assert_eq!(parse_date_cell(""), None);
        assert_eq!(parse_date_cell("01/05/2024"), None);
        assert_eq!(parse_date_cell("2024-02-30"), None);
        assert_eq!(parse_date_cell("2024-05-01 later"), None);
    }

    #[test]
    fn format_date_is_iso() {
        assert_eq!(format_date(day("2024-05-01")), "2024-05-01");
    }

    #[test]
    fn toggled_adds_then_removes_without_touching_receiver() {
        let roster = ParticipantRoster::default();
        let akanup = roster.resolve("Akanup").unwrap();
        let empty = AvailabilitySet::new();

        let added = empty.toggled(akanup, day("2024-05-01"));
        assert!(empty.is_empty());
        assert!(added.contains(akanup, day("2024-05-01")));

        let removed = added.toggled(akanup, day("2024-05-01"));
        assert!(added.contains(akanup, day("2024-05-01")));
        assert_eq!(removed, empty);
    }

    #[test]
    fn from_iter_collapses_duplicate_pairs() {
        let roster = ParticipantRoster::default();
        let client = roster.resolve("Client").unwrap();
        let set: AvailabilitySet = [
            AvailabilityRecord::new(client.clone(), day("2024-05-02")),
            AvailabilityRecord::new(client.clone(), day("2024-05-02")),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dates_for_filters_by_participant() {
        let roster = ParticipantRoster::default();
        let akanup = roster.resolve("Akanup").unwrap();
        let client = roster.resolve("Client").unwrap();
        let set = AvailabilitySet::new()
            .toggled(akanup, day("2024-05-03"))
            .toggled(client, day("2024-05-01"))
            .toggled(akanup, day("2024-05-01"));

        let dates: Vec<_> = set.dates_for(akanup).into_iter().collect();
        assert_eq!(dates, vec![day("2024-05-01"), day("2024-05-03")]);
    }
}
