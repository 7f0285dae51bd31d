//! Freshness-window read cache over any availability repository.
//!
//! # Invariants
//! - Cached rows are served for at most `ttl`; a zero `ttl` disables caching.
//! - Every write invalidates the cache before reaching the inner repository,
//!   whether or not the write succeeds.

use crate::repo::availability_repo::{AvailabilityRepository, AvailabilityRow, RepoResult};
use log::debug;
use std::cell::RefCell;
use std::time::{Duration, Instant};

struct CachedRead {
    rows: Vec<AvailabilityRow>,
    fetched_at: Instant,
}

/// Repository decorator that absorbs repeated reads within a short window.
pub struct CachedAvailabilityRepository<R> {
    inner: R,
    ttl: Duration,
    cached: RefCell<Option<CachedRead>>,
}

impl<R: AvailabilityRepository> CachedAvailabilityRepository<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RefCell::new(None),
        }
    }

    /// Drops any cached read.
    pub fn invalidate(&self) {
        self.cached.borrow_mut().take();
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn fresh_rows(&self) -> Option<Vec<AvailabilityRow>> {
        let cached = self.cached.borrow();
        let entry = cached.as_ref()?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.rows.clone())
        } else {
            None
        }
    }
}

impl<R: AvailabilityRepository> AvailabilityRepository for CachedAvailabilityRepository<R> {
    fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>> {
        if let Some(rows) = self.fresh_rows() {
            debug!(
                "event=sheet_read module=cache status=hit rows={}",
                rows.len()
            );
            return Ok(rows);
        }

        let rows = self.inner.read_rows()?;
        if !self.ttl.is_zero() {
            *self.cached.borrow_mut() = Some(CachedRead {
                rows: rows.clone(),
                fetched_at: Instant::now(),
            });
        }
        Ok(rows)
    }

    fn replace_rows(&self, rows: &[AvailabilityRow]) -> RepoResult<()> {
        self.invalidate();
        self.inner.replace_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::CachedAvailabilityRepository;
    use crate::repo::availability_repo::{AvailabilityRepository, AvailabilityRow, RepoResult};
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingRepo {
        rows: RefCell<Vec<AvailabilityRow>>,
        reads: Cell<usize>,
    }

    impl AvailabilityRepository for CountingRepo {
        fn read_rows(&self) -> RepoResult<Vec<AvailabilityRow>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.rows.borrow().clone())
        }

        fn replace_rows(&self, rows: &[AvailabilityRow]) -> RepoResult<()> {
            *self.rows.borrow_mut() = rows.to_vec();
            Ok(())
        }
    }

    #[test]
    fn reads_within_window_hit_cache() {
        let inner = CountingRepo::default();
        let repo = CachedAvailabilityRepository::new(&inner, Duration::from_secs(60));

        repo.read_rows().unwrap();
        repo.read_rows().unwrap();
        assert_eq!(inner.reads.get(), 1);
    }

    #[test]
    fn write_invalidates_so_next_read_observes_it() {
        let inner = CountingRepo::default();
        let repo = CachedAvailabilityRepository::new(&inner, Duration::from_secs(60));
        assert!(repo.read_rows().unwrap().is_empty());

        let written = vec![AvailabilityRow::new("Akanup", "2024-05-01")];
        repo.replace_rows(&written).unwrap();

        assert_eq!(repo.read_rows().unwrap(), written);
        assert_eq!(inner.reads.get(), 2);
    }

    #[test]
    fn zero_ttl_never_caches() {
        let inner = CountingRepo::default();
        let repo = CachedAvailabilityRepository::new(&inner, Duration::ZERO);

        repo.read_rows().unwrap();
        repo.read_rows().unwrap();
        assert_eq!(inner.reads.get(), 2);
    }
}
