//! Cache construction options

use crate::error::{Error, Result};

/// Options for building a [`SieveCache`](crate::SieveCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held at once
    pub capacity: usize,

    /// Reserve the slot arena and the index for `capacity` entries up front
    pub preallocate: bool,
}

impl CacheConfig {
    /// Config for a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            preallocate: false,
        }
    }

    /// Set whether storage is reserved at construction
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.preallocate = preallocate;
        self
    }

    /// Check the options describe a usable cache
    ///
    /// # Returns
    /// * `Err(Error::ZeroCapacity)` - capacity is 0
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(())
    }
}
