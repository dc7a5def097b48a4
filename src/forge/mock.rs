//! forge::mock
//!
//! Mock remote client for deterministic testing.
//!
//! # Design
//!
//! `MockClient` implements [`RemoteClient`] over an in-memory record list.
//! It counts fetches (the "network requests" of a test) and can be told to
//! fail the next fetch. Clones share state, so a test can keep a handle
//! after moving a clone into a [`CachedForge`](super::CachedForge).
//!
//! # Example
//!
//! ```
//! use gitforge::forge::mock::MockClient;
//! use gitforge::forge::RemoteClient;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let client = MockClient::new();
//! let records = client.fetch("github").await.unwrap();
//!
//! assert!(records.is_empty());
//! assert_eq!(client.fetch_count(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{ForgeError, RemoteClient};
use crate::core::types::ChangesetRecord;

/// Mock client for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockClientInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockClientInner {
    /// Records returned by the next successful fetch.
    records: Vec<ChangesetRecord>,
    /// Error returned by the next fetch, if any.
    fail_next: Option<ForgeError>,
    /// Number of fetch calls, including failed ones.
    fetches: usize,
}

impl MockClient {
    /// Create a mock client returning no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client returning `records`.
    pub fn with_records(records: Vec<ChangesetRecord>) -> Self {
        let client = Self::new();
        client.set_records(records);
        client
    }

    /// Replace the records returned by subsequent fetches.
    pub fn set_records(&self, records: Vec<ChangesetRecord>) {
        self.inner.lock().unwrap().records = records;
    }

    /// Fail the next fetch with `error`.
    pub fn fail_next(&self, error: ForgeError) {
        self.inner.lock().unwrap().fail_next = Some(error);
    }

    /// Number of fetch calls so far.
    pub fn fetch_count(&self) -> usize {
        self.inner.lock().unwrap().fetches
    }
}

#[async_trait]
impl RemoteClient for MockClient {
    async fn fetch(&self, forge: &str) -> Result<Vec<ChangesetRecord>, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches += 1;

        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }

        Ok(inner
            .records
            .iter()
            .cloned()
            .map(|mut record| {
                record.forge = forge.to_string();
                record
            })
            .collect())
    }
}
