use std::sync::atomic::{AtomicU64, Ordering};

/// A snapshot of how a [`Pool`][crate::Pool] has been used so far.
///
/// The counters are updated without synchronizing with each other, so a snapshot taken while
/// other threads are using the pool may be slightly inconsistent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct PoolStats {
    /// Acquisitions that were served by an idle object.
    pub hits: u64,

    /// Acquisitions that had to call the constructor.
    pub misses: u64,

    /// Releases that put the object back into the idle store.
    pub returns: u64,

    /// Releases that dropped the object because the idle store was full.
    pub discards: u64,
}

impl PoolStats {
    /// Total number of objects acquired from the pool.
    #[must_use]
    pub fn acquired(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// Total number of objects released into the pool.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.returns.saturating_add(self.discards)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    returns: AtomicU64,
    discards: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discard(&self) {
        self.discards.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            discards: self.discards.load(Ordering::Relaxed),
        }
    }
}
