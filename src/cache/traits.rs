//! cache::traits
//!
//! Cache storage trait definition.
//!
//! # Design
//!
//! The `CacheStore` trait is a forge-keyed, TTL-gated byte-blob store. It
//! knows nothing about changesets: callers serialize and decode payloads
//! themselves.
//!
//! Freshness is derived by the store (for the file store, from the file's
//! modification time) and never embedded in the payload, so external tools
//! such as `touch` or `rm` interoperate naturally.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::cache::{CacheError, CacheStore};
//!
//! fn load(store: &dyn CacheStore) -> Result<(), CacheError> {
//!     match store.read("github")? {
//!         Some(bytes) => println!("fresh cache: {} bytes", bytes.len()),
//!         None => println!("no usable cache"),
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from cache storage operations.
///
/// A missing or stale entry is not an error; see [`CacheStore::read`].
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading an existing entry (or its metadata) failed.
    #[error("failed to read cache file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating the cache directory or replacing the entry failed.
    #[error("failed to write cache file '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The payload could not be serialized before writing.
    #[error("failed to serialize cache payload for {forge}")]
    Serialize {
        forge: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for forge-keyed cache storage.
///
/// Implementations must be thread-safe (Send + Sync) so independent forges
/// can share one store.
pub trait CacheStore: Send + Sync {
    /// Read the payload for `forge`.
    ///
    /// Returns `Ok(Some(bytes))` if an entry exists and is within the
    /// freshness window.
    /// Returns `Ok(None)` if the entry is missing or stale.
    /// Returns `Err` on any other I/O failure.
    fn read(&self, forge: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace the payload for `forge` wholesale.
    ///
    /// The new content becomes fresh as of the time of the write.
    fn write(&self, forge: &str, payload: &[u8]) -> Result<(), CacheError>;
}
