//! Interaction cycle: load → toggle → persist → summarize.
//!
//! # Responsibility
//! - Carry per-request state explicitly (`InteractionContext`) instead of a
//!   process-wide session.
//! - Produce one immutable `CycleReport` for the view renderer.
//!
//! # Invariants
//! - At most one toggle is processed per cycle.
//! - On persist failure the report shows the loaded set, not the toggled one.
//! - A click is ignored when the load fell back to an empty set, so a
//!   backend outage can never overwrite stored rows.

use crate::model::availability::{AvailabilitySet, CalendarDate};
use crate::model::participant::ParticipantId;
use crate::repo::availability_repo::AvailabilityRepository;
use crate::service::availability_store::AvailabilityStore;
use crate::summary::{common_days, summarize, SummaryTable};
use crate::view::ViewRenderer;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A single calendar click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleEvent {
    pub participant: ParticipantId,
    pub date: CalendarDate,
}

/// Request-scoped state for one interaction cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionContext {
    cycle_id: Uuid,
    viewer: ParticipantId,
    event: Option<ToggleEvent>,
}

impl InteractionContext {
    /// Cycle that only renders the current state for `viewer`.
    pub fn view(viewer: ParticipantId) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            viewer,
            event: None,
        }
    }

    /// Cycle where `participant` clicked `date`; the clicker is the viewer.
    pub fn click(participant: ParticipantId, date: CalendarDate) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            viewer: participant.clone(),
            event: Some(ToggleEvent { participant, date }),
        }
    }

    pub fn cycle_id(&self) -> Uuid {
        self.cycle_id
    }

    pub fn viewer(&self) -> &ParticipantId {
        &self.viewer
    }

    pub fn event(&self) -> Option<&ToggleEvent> {
        self.event.as_ref()
    }
}

/// What happened to the cycle's click, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// No click in this cycle.
    NoEvent,
    /// Pair was absent and is now stored.
    Added,
    /// Pair was present and is now removed.
    Removed,
    /// Load fell back to an empty set; the click was not applied.
    Skipped,
    /// Write-back failed; stored state is unchanged.
    NotSaved,
}

/// User-facing warnings collected during one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CycleWarning {
    PersistenceUnavailable(String),
    PersistenceError(String),
    DroppedRows(usize),
}

/// Immutable result of one interaction cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub viewer: ParticipantId,
    pub toggle: ToggleOutcome,
    /// Last known-persisted set.
    pub set: AvailabilitySet,
    pub summary: SummaryTable,
    pub common_days: BTreeSet<CalendarDate>,
    /// Viewer's own available days, for calendar highlighting.
    pub highlighted: BTreeSet<CalendarDate>,
    pub warnings: Vec<CycleWarning>,
}

impl CycleReport {
    /// Whether the cycle completed without any warning.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl<R: AvailabilityRepository> AvailabilityStore<R> {
    /// Runs one full cycle for `ctx`.
    ///
    /// Never fails: persistence problems surface as `CycleReport::warnings`.
    pub fn run_cycle(&self, ctx: &InteractionContext) -> CycleReport {
        let loaded = self.load();
        let mut warnings = Vec::new();
        if !loaded.dropped.is_empty() {
            warnings.push(CycleWarning::DroppedRows(loaded.dropped.len()));
        }

        let available = loaded.is_available();
        if let Some(err) = loaded.warning {
            warnings.push(CycleWarning::PersistenceUnavailable(err.to_string()));
        }

        let (set, toggle) = match ctx.event() {
            None => (loaded.set, ToggleOutcome::NoEvent),
            Some(_) if !available => {
                warn!(
                    "event=interaction_cycle module=service status=degraded cycle_id={} reason=toggle_skipped_unavailable",
                    ctx.cycle_id()
                );
                (loaded.set, ToggleOutcome::Skipped)
            }
            Some(event) => {
                let was_present = loaded.set.contains(&event.participant, event.date);
                let toggled = self.toggle(&loaded.set, &event.participant, event.date);
                match self.persist(&toggled) {
                    Ok(()) if was_present => (toggled, ToggleOutcome::Removed),
                    Ok(()) => (toggled, ToggleOutcome::Added),
                    Err(err) => {
                        warnings.push(CycleWarning::PersistenceError(err.to_string()));
                        (loaded.set, ToggleOutcome::NotSaved)
                    }
                }
            }
        };

        let summary = summarize(&set, self.roster().participants());
        let common = common_days(&summary, self.roster().len());
        let highlighted = set.dates_for(ctx.viewer());

        info!(
            "event=interaction_cycle module=service status={} cycle_id={} viewer={} toggle={:?} days={} common_days={}",
            if warnings.is_empty() { "ok" } else { "degraded" },
            ctx.cycle_id(),
            ctx.viewer(),
            toggle,
            summary.len(),
            common.len()
        );

        CycleReport {
            cycle_id: ctx.cycle_id(),
            viewer: ctx.viewer().clone(),
            toggle,
            set,
            summary,
            common_days: common,
            highlighted,
            warnings,
        }
    }

    /// Runs one cycle and hands the report to `view`.
    pub fn run_and_render<V: ViewRenderer>(
        &self,
        ctx: &InteractionContext,
        view: &mut V,
    ) -> Result<CycleReport, V::Error> {
        let report = self.run_cycle(ctx);
        view.render(&report)?;
        Ok(report)
    }
}
