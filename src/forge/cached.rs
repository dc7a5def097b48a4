//! forge::cached
//!
//! The cache-coherent forge binding.
//!
//! # Design
//!
//! `CachedForge` binds a name, a [`RemoteClient`], and a shared
//! [`CacheStore`] into the [`Forge`] capability. It holds no mutable state
//! and is cheap to rebuild for every invocation.
//!
//! # Cache Policy
//!
//! | operation | cache fresh | cache missing/stale | cache write fails |
//! |---|---|---|---|
//! | `cached_fetch` | decode, no network; decode failure is an error | fetch + write | warning only |
//! | `refresh` | ignored | ignored | error |
//!
//! The asymmetry is deliberate: `cached_fetch` already holds fresh data
//! when a write fails, while `refresh` exists only to update the cache.
//! A corrupt cache is never silently treated as a miss.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use super::traits::{Forge, ForgeError, RemoteClient};
use crate::cache::{CacheError, CacheStore};
use crate::core::types::ChangesetRecord;
use crate::ui::menu;
use crate::ui::output::{self, Verbosity};

/// A forge whose listing is served through the changeset cache.
pub struct CachedForge<C> {
    /// Forge name; also the cache key and credential directory
    name: String,
    /// API client and normalizer
    client: C,
    /// Shared cache store
    cache: Arc<dyn CacheStore>,
    /// Diagnostic verbosity
    verbosity: Verbosity,
}

impl<C> std::fmt::Debug for CachedForge<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedForge")
            .field("name", &self.name)
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

impl<C: RemoteClient> CachedForge<C> {
    /// Bind `client` under `name` to `cache`.
    pub fn new(name: impl Into<String>, client: C, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            name: name.into(),
            client,
            cache,
            verbosity: Verbosity::Normal,
        }
    }

    /// Set the diagnostic verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Fetch from the forge, announcing the result count.
    async fn fetch(&self) -> Result<Vec<ChangesetRecord>, ForgeError> {
        let records = self.client.fetch(&self.name).await?;
        output::debug(
            format!("{}: fetched {} changesets", self.name, records.len()),
            self.verbosity,
        );
        Ok(records)
    }

    /// Serialize and store `records`.
    fn store(&self, records: &[ChangesetRecord]) -> Result<(), CacheError> {
        let payload = serde_json::to_vec_pretty(records).map_err(|e| CacheError::Serialize {
            forge: self.name.clone(),
            source: e,
        })?;
        self.cache.write(&self.name, &payload)
    }

    fn decode(&self, payload: &[u8]) -> Result<Vec<ChangesetRecord>, ForgeError> {
        serde_json::from_slice(payload)
            .map_err(|e| ForgeError::format(format!("failed to parse {} cache", self.name), e))
    }
}

#[async_trait]
impl<C: RemoteClient> Forge for CachedForge<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn cached_fetch(&self) -> Result<Vec<ChangesetRecord>, ForgeError> {
        if let Some(payload) = self.cache.read(&self.name)? {
            let records = self.decode(&payload)?;
            output::debug(
                format!("{}: read {} changesets from cache", self.name, records.len()),
                self.verbosity,
            );
            return Ok(records);
        }

        let records = self.fetch().await?;

        if let Err(e) = self.store(&records) {
            output::warn(
                format!(
                    "{}: failed to write cache (continuing): {}",
                    self.name,
                    error_chain(&e)
                ),
                self.verbosity,
            );
        }

        Ok(records)
    }

    async fn refresh(&self) -> Result<(), ForgeError> {
        let records = self.fetch().await?;
        self.store(&records)?;
        output::debug(
            format!("{}: cached {} changesets", self.name, records.len()),
            self.verbosity,
        );
        Ok(())
    }

    async fn list(&self, out: &mut (dyn Write + Send)) -> Result<(), ForgeError> {
        let records = self.cached_fetch().await?;
        menu::write_entries(out, &records).map_err(ForgeError::Output)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
