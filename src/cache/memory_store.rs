//! cache::memory_store
//!
//! In-memory cache storage for deterministic testing.
//!
//! # Design
//!
//! `MemoryCacheStore` honors the same freshness contract as the file store
//! but keeps entries in a map, records writes, and can be told to fail
//! writes or to age an entry. Clones share state.
//!
//! # Example
//!
//! ```
//! use gitforge::cache::{CacheStore, MemoryCacheStore, DEFAULT_TTL};
//! use std::time::Duration;
//!
//! let store = MemoryCacheStore::new(DEFAULT_TTL);
//! store.write("github", b"[]").unwrap();
//! assert!(store.read("github").unwrap().is_some());
//!
//! store.backdate("github", Duration::from_secs(4 * 60 * 60));
//! assert!(store.read("github").unwrap().is_none());
//! ```

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use super::traits::{CacheError, CacheStore};

/// In-memory cache store.
#[derive(Debug, Clone)]
pub struct MemoryCacheStore {
    inner: Arc<Mutex<MemoryCacheInner>>,
}

#[derive(Debug)]
struct MemoryCacheInner {
    ttl: Duration,
    entries: HashMap<String, MemoryEntry>,
    fail_writes: bool,
    writes: usize,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: Vec<u8>,
    stored_at: SystemTime,
}

impl MemoryCacheStore {
    /// Create an empty store with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryCacheInner {
                ttl,
                entries: HashMap::new(),
                fail_writes: false,
                writes: 0,
            })),
        }
    }

    /// Store a payload as if written now, bypassing failure injection and
    /// the write counter.
    pub fn insert_raw(&self, forge: &str, payload: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.insert(
            forge.to_string(),
            MemoryEntry {
                payload: payload.to_vec(),
                stored_at: SystemTime::now(),
            },
        );
    }

    /// Get the stored payload regardless of freshness.
    pub fn get_raw(&self, forge: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.entries.get(forge).map(|e| e.payload.clone())
    }

    /// Make the entry for `forge` look `age` old.
    pub fn backdate(&self, forge: &str, age: Duration) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.entries.get_mut(forge) {
            entry.stored_at = SystemTime::now() - age;
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, forge: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let inner = self.inner.lock().unwrap();
        let Some(entry) = inner.entries.get(forge) else {
            return Ok(None);
        };

        let age = SystemTime::now()
            .duration_since(entry.stored_at)
            .unwrap_or(Duration::ZERO);
        if age < inner.ttl {
            Ok(Some(entry.payload.clone()))
        } else {
            Ok(None)
        }
    }

    fn write(&self, forge: &str, payload: &[u8]) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(CacheError::Write {
                path: PathBuf::from(format!("memory://{}", forge)),
                source: io::Error::new(io::ErrorKind::Other, "writes disabled"),
            });
        }

        inner.entries.insert(
            forge.to_string(),
            MemoryEntry {
                payload: payload.to_vec(),
                stored_at: SystemTime::now(),
            },
        );
        inner.writes += 1;
        Ok(())
    }
}
