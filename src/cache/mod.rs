//! cache
//!
//! Time-bounded changeset cache.
//!
//! # Architecture
//!
//! Cached payloads are stored through the `CacheStore` trait, which has
//! two implementations:
//!
//! - [`FileCacheStore`]: One JSON file per forge under the cache root (default)
//! - [`MemoryCacheStore`]: In-memory map for tests
//!
//! # Policy
//!
//! - An entry is usable only while its age is below the TTL (default 180 minutes)
//! - A missing or stale entry reads as `None`, never as an error
//! - Entries are replaced wholesale and never deleted by this crate
//!
//! Deleting the cache directory is always safe; the only cost is a refetch.

mod file_store;
mod memory_store;
mod traits;

pub use file_store::{FileCacheStore, DEFAULT_TTL};
pub use memory_store::MemoryCacheStore;
pub use traits::{CacheError, CacheStore};
