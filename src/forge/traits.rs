//! forge::traits
//!
//! Trait definitions for forge backends and the forge capability.
//!
//! # Design
//!
//! Two seams:
//!
//! - [`RemoteClient`]: one per wire protocol. Fetches from the forge API and
//!   normalizes the native response into [`ChangesetRecord`]s.
//! - [`Forge`]: what the dispatcher drives. Exactly three operations
//!   (`list`, `refresh`, `cached_fetch`) plus a stable `name`.
//!
//! [`CachedForge`](super::CachedForge) implements `Forge` once for every
//! `RemoteClient`, so adding a forge means adding a client and nothing else.
//!
//! Both traits are async because forge operations involve network I/O.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::forge::{Forge, ForgeError};
//!
//! async fn show(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     for record in forge.cached_fetch().await? {
//!         println!("{} {}", record.key(), record.title);
//!     }
//!     Ok(())
//! }
//! ```

use std::io::{self, Write};

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::CacheError;
use crate::core::types::ChangesetRecord;
use crate::secrets::SecretError;

/// Errors from forge operations.
///
/// | variant | meaning | retryable |
/// |---|---|---|
/// | `Configuration` | credential file missing or unreadable | no |
/// | `Transport` | request could not be built or sent | by the caller |
/// | `Api` | forge answered with a non-2xx status | by the caller |
/// | `Protocol` | 2xx answer with an unusable body | no |
/// | `Format` | undecodable JSON, from the network or the cache | no |
/// | `Persistence` | cache read I/O or cache write failure | by the caller |
/// | `Output` | writing menu lines failed | no |
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Credentials are missing or unreadable.
    #[error(transparent)]
    Configuration(#[from] SecretError),

    /// Request construction or execution failed.
    #[error("{context}")]
    Transport {
        /// What was being attempted
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The response was successful but not usable.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// JSON could not be decoded.
    #[error("{context}")]
    Format {
        /// What was being decoded
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The cache could not be read or written.
    #[error(transparent)]
    Persistence(#[from] CacheError),

    /// Menu output could not be written.
    #[error("failed to write menu output")]
    Output(#[source] io::Error),
}

impl ForgeError {
    /// Build a `Transport` error.
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        ForgeError::Transport {
            context: context.into(),
            source,
        }
    }

    /// Build a `Format` error.
    pub fn format(context: impl Into<String>, source: serde_json::Error) -> Self {
        ForgeError::Format {
            context: context.into(),
            source,
        }
    }
}

/// A forge API client paired with its normalizer.
///
/// # Contract
///
/// - One call issues every request needed for a complete result
///   (one GraphQL POST for GitHub, two scoped GETs for GitLab)
/// - Credentials are read at call time, under `forge`
/// - Every returned record carries `forge` as its producing forge
/// - Nothing is retried
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetch and normalize all changesets relevant to the user.
    async fn fetch(&self, forge: &str) -> Result<Vec<ChangesetRecord>, ForgeError>;
}

/// The forge capability driven by the dispatcher.
///
/// # Error Handling
///
/// - `cached_fetch` treats a failed cache *write* as a warning but a
///   failed cache *decode* as an error
/// - `refresh` surfaces a failed cache write
/// - `list` aborts on the first error
#[async_trait]
pub trait Forge: Send + Sync {
    /// Stable forge identifier; also the cache key.
    fn name(&self) -> &str;

    /// Serve from the cache if fresh, else fetch and repopulate it.
    async fn cached_fetch(&self) -> Result<Vec<ChangesetRecord>, ForgeError>;

    /// Fetch unconditionally and overwrite the cache.
    async fn refresh(&self) -> Result<(), ForgeError>;

    /// Render every record as one menu line on `out`.
    async fn list(&self, out: &mut (dyn Write + Send)) -> Result<(), ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!(
                "{}",
                ForgeError::Api {
                    status: 401,
                    message: "Bad credentials".into()
                }
            ),
            "API error: 401 - Bad credentials"
        );
        assert_eq!(
            format!("{}", ForgeError::Protocol("missing data".into())),
            "unexpected response: missing data"
        );
    }

    #[test]
    fn configuration_error_is_transparent() {
        let err: ForgeError = SecretError::NotFound {
            forge: "gitlab".into(),
            key: "token".into(),
            path: PathBuf::from("/cfg/gitlab/token"),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "no token found for forge gitlab in '/cfg/gitlab/token'"
        );
    }

    #[test]
    fn format_error_keeps_source() {
        let source = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = ForgeError::format("failed to parse github cache", source);

        assert_eq!(err.to_string(), "failed to parse github cache");
        assert!(std::error::Error::source(&err).is_some());
    }
}
