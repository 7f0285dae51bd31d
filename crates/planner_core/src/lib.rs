//! Core availability logic for the planner.
//! This crate is the single source of truth for toggle and aggregation rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod summary;
pub mod view;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::availability::{
    format_date, parse_date_cell, AvailabilityRecord, AvailabilitySet, CalendarDate,
};
pub use model::participant::{ParticipantId, ParticipantRoster, RosterError};
pub use repo::availability_repo::{
    AvailabilityRepository, AvailabilityRow, RepoError, RepoResult, SqliteAvailabilityRepository,
};
pub use repo::cached_repo::CachedAvailabilityRepository;
pub use repo::unreachable_repo::UnreachableRepository;
pub use service::availability_store::{
    AvailabilityStore, LoadOutcome, MalformedReason, MalformedRecord, StoreError,
};
pub use service::interaction::{
    CycleReport, CycleWarning, InteractionContext, ToggleEvent, ToggleOutcome,
};
pub use summary::{common_days, summarize, SummaryRow, SummaryTable};
pub use view::{common_days_announcement, ViewRenderer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
