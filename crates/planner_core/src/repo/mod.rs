//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the raw row read/replace contract the store depends on.
//! - Isolate SQLite details and read caching from store/business logic.
//! - Stand in for a backend that could not be opened.
//!
//! # Invariants
//! - `replace_rows` is whole-sheet replace-or-fail.
//! - A read issued after a successful write by the same process observes it.

pub mod availability_repo;
pub mod cached_repo;
pub mod unreachable_repo;
