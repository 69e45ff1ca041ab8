//! Hit, miss and eviction counters

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for a [`SieveCache`](crate::SieveCache).
///
/// Updated while the cache lock is held, readable without it. Counters are
/// independent, so a read racing with an update may see one counter bumped
/// and not another; use [`snapshot`](Self::snapshot) for a report.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Entries created
    pub inserts: u64,
    /// Entries removed by the hand sweep
    pub evictions: u64,
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_lookup(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insert(&self, evicted: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        if evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Lookups that found their key
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that missed
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Entries created by `add` or `probe`
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Entries evicted to make room
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that hit, 0.0 before any lookup
    pub fn hit_ratio(&self) -> f64 {
        self.snapshot().hit_ratio()
    }

    /// Copy all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            inserts: self.inserts(),
            evictions: self.evictions(),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        for counter in [&self.hits, &self.misses, &self.inserts, &self.evictions] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl StatsSnapshot {
    /// Fraction of lookups that hit, 0.0 when there were none
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits {}, misses {}, ratio {:.2}, inserts {}, evictions {}",
            self.hits,
            self.misses,
            self.hit_ratio(),
            self.inserts,
            self.evictions
        )
    }
}
