//! Availability use-case services.
//!
//! # Responsibility
//! - Own the load/toggle/persist/clear operations over a repository.
//! - Drive request-scoped interaction cycles for view layers.

pub mod availability_store;
pub mod interaction;
