//! Participant roster model.
//!
//! # Responsibility
//! - Hold the fixed, ordered participant list configured for one planner.
//! - Resolve free-form input (CLI args, sheet cells) to roster members.
//!
//! # Invariants
//! - Roster is non-empty, names are trimmed, non-blank and unique.
//! - Roster order is the column order used by every summary projection.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Roster used when no configuration overrides it.
pub const DEFAULT_PARTICIPANTS: &[&str] = &["Akanup", "Client", "Formateur"];

/// Identifier of one configured participant role.
///
/// Only a `ParticipantRoster` can mint values, so holding one proves roster
/// membership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roster validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// No participant configured.
    Empty,
    /// One entry is blank after trimming.
    BlankName,
    /// Same name listed twice.
    Duplicate(String),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "participant roster cannot be empty"),
            Self::BlankName => write!(f, "participant name cannot be blank"),
            Self::Duplicate(name) => write!(f, "participant listed twice: `{name}`"),
        }
    }
}

impl Error for RosterError {}

/// Fixed, ordered participant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRoster {
    participants: Vec<ParticipantId>,
}

impl ParticipantRoster {
    /// Builds a roster preserving input order.
    ///
    /// # Errors
    /// - `Empty` when `names` yields nothing.
    /// - `BlankName` / `Duplicate` on invalid entries (compared after trim).
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut participants: Vec<ParticipantId> = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                return Err(RosterError::BlankName);
            }
            if participants.iter().any(|existing| existing.as_str() == trimmed) {
                return Err(RosterError::Duplicate(trimmed.to_string()));
            }
            participants.push(ParticipantId(trimmed.to_string()));
        }

        if participants.is_empty() {
            return Err(RosterError::Empty);
        }

        Ok(Self { participants })
    }

    /// Participants in configured order.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Always `false` for a constructed roster.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Resolves a raw name (trimmed, case-sensitive) to a roster member.
    pub fn resolve(&self, name: &str) -> Option<&ParticipantId> {
        let trimmed = name.trim();
        self.participants
            .iter()
            .find(|participant| participant.as_str() == trimmed)
    }

    /// Column index of `participant` in roster order.
    pub fn position(&self, participant: &ParticipantId) -> Option<usize> {
        self.participants
            .iter()
            .position(|candidate| candidate == participant)
    }
}

impl Default for ParticipantRoster {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS
                .iter()
                .map(|name| ParticipantId((*name).to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParticipantRoster, RosterError, DEFAULT_PARTICIPANTS};

    #[test]
    fn default_roster_keeps_configured_order() {
        let roster = ParticipantRoster::default();
        let names: Vec<&str> = roster.participants().iter().map(|p| p.as_str()).collect();
        assert_eq!(names, DEFAULT_PARTICIPANTS);
    }

    #[test]
    fn new_trims_and_rejects_duplicates() {
        let err = ParticipantRoster::new(["Akanup", " Akanup "]).unwrap_err();
        assert_eq!(err, RosterError::Duplicate("Akanup".to_string()));
    }

    #[test]
    fn new_rejects_blank_and_empty_lists() {
        assert_eq!(
            ParticipantRoster::new(["Akanup", "  "]).unwrap_err(),
            RosterError::BlankName
        );
        assert_eq!(
            ParticipantRoster::new(Vec::<String>::new()).unwrap_err(),
            RosterError::Empty
        );
    }

    #[test]
    fn resolve_is_trimmed_and_case_sensitive() {
        let roster = ParticipantRoster::default();
        assert_eq!(roster.resolve(" Client ").unwrap().as_str(), "Client");
        assert!(roster.resolve("client").is_none());
        assert!(roster.resolve("").is_none());
    }

    #[test]
    fn position_follows_roster_order() {
        let roster = ParticipantRoster::default();
        let formateur = roster.resolve("Formateur").unwrap();
        assert_eq!(roster.position(formateur), Some(2));
    }
}
