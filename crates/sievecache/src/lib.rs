//! # sievecache
//!
//! Fixed-capacity in-memory cache using the SIEVE eviction policy.
//!
//! ## Architecture
//! - **Index**: AHash map from key to slot (O(1) lookups)
//! - **Eviction list**: slot-indexed doubly linked list, newest at the head
//! - **Hand**: persistent cursor that sweeps from the tail towards the head,
//!   clearing visited bits and evicting the first unvisited entry
//! - **Locking**: one `parking_lot` mutex around index, list and hand
//!
//! Hits only set a bit; unlike LRU nothing is relinked on access.
//!
//! ```
//! use sievecache::SieveCache;
//!
//! let cache = SieveCache::new(2).unwrap();
//! cache.add("a", 1);
//! cache.add("b", 2);
//! assert_eq!(cache.get("a"), Some(1));
//!
//! // "a" was visited, so "b" makes room for "c"
//! cache.add("c", 3);
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.probe("a", 10), (1, true));
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod list;
mod sieve;
mod stats;

pub use cache::SieveCache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use stats::{CacheStats, StatsSnapshot};
