//! Availability domain model.
//!
//! # Responsibility
//! - Define the canonical participant/date shapes shared by store, summary
//!   and view layers.
//! - Keep roster membership and set semantics enforced by construction.
//!
//! # Invariants
//! - A `ParticipantId` always belongs to the roster that produced it.
//! - An `AvailabilitySet` holds at most one record per (participant, date).

pub mod availability;
pub mod participant;
