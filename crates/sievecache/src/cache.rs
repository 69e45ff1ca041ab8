//! SieveCache: thread-safe handle over the SIEVE core

use std::borrow::Borrow;
use std::fmt::{self, Debug, Write as _};
use std::hash::Hash;
use std::io::Write;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::sieve::{Outcome, Sieve};
use crate::stats::CacheStats;

/// Fixed-capacity cache with SIEVE eviction, safe to share between threads.
///
/// Every operation takes one exclusive lock for its whole duration, lookups
/// included, since a hit sets the entry's visited flag. Share it with `Arc`.
pub struct SieveCache<K, V> {
    /// Index and eviction list
    inner: Mutex<Sieve<K, V>>,

    /// Cache statistics
    stats: CacheStats,

    /// Cache capacity
    capacity: usize,
}

impl<K, V> SieveCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new SieveCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries
    ///
    /// # Returns
    /// * `Err(Error::ZeroCapacity)` - capacity is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create a new SieveCache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            capacity = config.capacity,
            preallocate = config.preallocate,
            "creating sieve cache"
        );

        Ok(Self {
            inner: Mutex::new(Sieve::new(config.capacity, config.preallocate)),
            stats: CacheStats::new(),
            capacity: config.capacity,
        })
    }

    /// Get a copy of the value cached under `key`
    ///
    /// A hit marks the entry visited, sparing it from the next eviction
    /// sweep. The entry's position is not changed.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Run `f` on the value cached under `key` while the lock is held
    ///
    /// Same hit semantics as [`get`](Self::get), without cloning the value.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let mut inner = self.inner.lock();
        let result = inner.get(key).map(f);
        self.stats.record_lookup(result.is_some());
        result
    }

    /// Insert a value, overwriting any value already cached under `key`
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - New value
    ///
    /// # Returns
    /// * `true` - key was present; value replaced and entry marked visited
    /// * `false` - key was new; an entry may have been evicted for it
    pub fn add(&self, key: K, value: V) -> bool {
        let mut inner = self.inner.lock();
        let outcome = inner.add(key, value);
        self.record_insert(outcome);
        outcome.is_hit()
    }

    /// Insert a value only if `key` is absent
    ///
    /// # Returns
    /// * `(stored, true)` - key was present; `value` is dropped and the
    ///   entry marked visited
    /// * `(value, false)` - key was absent and `value` is now cached
    pub fn probe(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        let mut inner = self.inner.lock();
        let (value, outcome) = inner.probe(key, value);
        self.stats.record_lookup(outcome.is_hit());
        self.record_insert(outcome);
        (value, outcome.is_hit())
    }

    /// Remove `key` from the cache
    ///
    /// # Returns
    /// * `true` if an entry was removed
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key).is_some()
    }

    /// Check whether `key` is cached, without marking it visited
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Drop every entry. Capacity and statistics are kept.
    pub fn purge(&self) {
        let dropped = self.inner.lock().purge();
        debug!(dropped, "purged sieve cache");
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Write every entry, newest first, to `wr`
    ///
    /// For debugging. The whole dump is formatted under the lock and handed
    /// to `wr` in a single write.
    ///
    /// # Returns
    /// * `Err(Error::Io)` if the sink fails
    pub fn dump<W: Write>(&self, wr: &mut W) -> Result<()>
    where
        K: Debug,
        V: Debug,
    {
        let mut out = String::new();
        {
            let inner = self.inner.lock();
            // Writing to a String cannot fail
            let _ = self.format_dump(&inner, &mut out);
        }
        wr.write_all(out.as_bytes())?;
        Ok(())
    }

    fn format_dump(&self, inner: &Sieve<K, V>, out: &mut String) -> fmt::Result
    where
        K: Debug,
        V: Debug,
    {
        writeln!(
            out,
            "cache<{}>: size {}, cap {}",
            std::any::type_name::<Self>(),
            inner.len(),
            self.capacity
        )?;
        for entry in inner.iter() {
            writeln!(
                out,
                "  visited={}, key={:?}, val={:?}",
                entry.visited, entry.key, entry.value
            )?;
        }
        Ok(())
    }

    fn record_insert(&self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => {}
            Outcome::Inserted => self.stats.record_insert(false),
            Outcome::Evicted => self.stats.record_insert(true),
        }
    }
}

impl<K, V> Debug for SieveCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
