//! SIEVE cache core: hash index plus eviction list
//!
//! Not synchronized. [`SieveCache`](crate::SieveCache) owns one of these
//! behind its lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::list::{Entry, Iter, SieveList};

/// What an insertion attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Key was already cached
    Hit,
    /// New entry, there was free room
    Inserted,
    /// New entry, one old entry was evicted to make room
    Evicted,
}

impl Outcome {
    pub(crate) fn is_hit(self) -> bool {
        self == Outcome::Hit
    }
}

/// Fixed-capacity map with SIEVE eviction
pub(crate) struct Sieve<K, V> {
    /// Key to list slot. The list owns the entries.
    index: HashMap<K, usize, RandomState>,
    list: SieveList<K, V>,
    capacity: usize,
}

impl<K, V> Sieve<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache. `capacity` must be non-zero.
    pub(crate) fn new(capacity: usize, preallocate: bool) -> Self {
        debug_assert!(capacity > 0, "Capacity must be greater than 0");

        let (index, list) = if preallocate {
            (
                HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
                SieveList::with_capacity(capacity),
            )
        } else {
            (HashMap::with_hasher(RandomState::new()), SieveList::new())
        };

        Self {
            index,
            list,
            capacity,
        }
    }

    /// Look up `key` and mark it visited
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.visit(key).map(|entry| &entry.value)
    }

    /// Check membership without touching the visited flag
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Insert or overwrite. An overwrite marks the entry visited and keeps
    /// its list position.
    pub(crate) fn add(&mut self, key: K, value: V) -> Outcome {
        if let Some(entry) = self.visit(&key) {
            entry.value = value;
            return Outcome::Hit;
        }
        self.insert_new(key, value)
    }

    /// Insert only if absent.
    ///
    /// # Returns
    /// * The stored value and `Outcome::Hit` when `key` was present
    /// * The supplied value and the insert outcome otherwise
    pub(crate) fn probe(&mut self, key: K, value: V) -> (V, Outcome)
    where
        V: Clone,
    {
        if let Some(entry) = self.visit(&key) {
            return (entry.value.clone(), Outcome::Hit);
        }
        let outcome = self.insert_new(key, value.clone());
        (value, outcome)
    }

    /// Remove `key`. Returns its value if it was cached.
    pub(crate) fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.remove(idx).map(|entry| entry.value)
    }

    /// Drop every entry. Returns how many were dropped.
    pub(crate) fn purge(&mut self) -> usize {
        let dropped = self.list.len();
        self.index.clear();
        self.list.clear();
        dropped
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    /// Entries from newest to oldest insertion
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    fn visit<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &idx = self.index.get(key)?;
        let entry = self.list.get_mut(idx)?;
        entry.visited = true;
        Some(entry)
    }

    fn insert_new(&mut self, key: K, value: V) -> Outcome {
        let mut outcome = Outcome::Inserted;

        if self.list.len() >= self.capacity {
            if let Some(victim) = self.list.evict() {
                self.index.remove(&victim.key);
                outcome = Outcome::Evicted;
            }
        }

        let idx = self.list.push_front(key.clone(), value);
        self.index.insert(key, idx);
        outcome
    }
}

#[cfg(test)]
impl<K, V> Sieve<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
{
    /// Verify the index and the list describe the same entries
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        self.list.check_links()?;

        if self.len() > self.capacity {
            return Err(format!("len {} exceeds capacity {}", self.len(), self.capacity));
        }
        if self.index.len() != self.list.len() {
            return Err(format!(
                "index has {} keys, list has {} entries",
                self.index.len(),
                self.list.len()
            ));
        }
        for (key, &idx) in &self.index {
            match self.list.get(idx) {
                Some(entry) if entry.key == *key => {}
                Some(entry) => {
                    return Err(format!(
                        "index maps {:?} to slot {} holding {:?}",
                        key, idx, entry.key
                    ))
                }
                None => return Err(format!("index maps {:?} to empty slot {}", key, idx)),
            }
        }

        Ok(())
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn keys(&self) -> Vec<K> {
        self.iter().map(|entry| entry.key.clone()).collect()
    }

    pub(crate) fn slots(&self) -> usize {
        self.list.slots()
    }
}
