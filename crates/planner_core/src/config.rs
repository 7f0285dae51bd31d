//! Planner configuration.
//!
//! # Responsibility
//! - Load the participant roster and persistence target from JSON.
//! - Fill every missing field with a working default.
//!
//! # Invariants
//! - A returned `PlannerConfig` always has a valid roster and non-blank sheet.
//! - Unknown JSON fields are rejected instead of silently ignored.

use crate::model::participant::{ParticipantRoster, RosterError, DEFAULT_PARTICIPANTS};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DATABASE_FILE: &str = "planner.sqlite3";
const DEFAULT_SHEET: &str = "Feuille 1";
const DEFAULT_FRESHNESS_TTL_SECS: u64 = 5;

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Roster(RosterError),
    BlankSheet,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Roster(err) => write!(f, "invalid config: {err}"),
            Self::BlankSheet => write!(f, "invalid config: sheet name cannot be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Roster(err) => Some(err),
            Self::BlankSheet => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<RosterError> for ConfigError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    participants: Vec<String>,
    database_path: PathBuf,
    sheet: String,
    freshness_ttl_secs: u64,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS.iter().map(|s| s.to_string()).collect(),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            sheet: DEFAULT_SHEET.to_string(),
            freshness_ttl_secs: DEFAULT_FRESHNESS_TTL_SECS,
            log_level: None,
            log_dir: None,
        }
    }
}

/// Validated planner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub roster: ParticipantRoster,
    pub database_path: PathBuf,
    pub sheet: String,
    pub freshness_ttl: Duration,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            roster: ParticipantRoster::default(),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            sheet: DEFAULT_SHEET.to_string(),
            freshness_ttl: Duration::from_secs(DEFAULT_FRESHNESS_TTL_SECS),
            log_level: None,
            log_dir: None,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let roster = ParticipantRoster::new(&raw.participants)?;
        let sheet = raw.sheet.trim();
        if sheet.is_empty() {
            return Err(ConfigError::BlankSheet);
        }

        Ok(Self {
            roster,
            database_path: raw.database_path,
            sheet: sheet.to_string(),
            freshness_ttl: Duration::from_secs(raw.freshness_ttl_secs),
            log_level: raw.log_level,
            log_dir: raw.log_dir,
        })
    }
}
