//! Error types for sievecache

use std::fmt;
use std::io;

/// Result type alias for sievecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the fallible edges of the cache.
///
/// Lookups and updates never fail; only construction and dumping do.
#[derive(Debug)]
pub enum Error {
    /// Capacity must be at least one entry
    ZeroCapacity,

    /// Writing a dump to the sink failed
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroCapacity => write!(f, "Cache capacity must be greater than 0"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
