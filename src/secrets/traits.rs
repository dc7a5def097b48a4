//! secrets::traits
//!
//! Credential storage trait definition.
//!
//! # Design
//!
//! The `SecretStore` trait is a read-only lookup of per-forge credentials
//! (`token`, `username`). Values are trimmed of surrounding whitespace.
//! A missing credential is reported with the exact location the user has
//! to create, because that is the one actionable thing to do about it.
//!
//! # Security
//!
//! Implementations MUST:
//! - Never log, print, or include secrets in error messages
//! - Be thread-safe (Send + Sync)
//!
//! # Example
//!
//! ```ignore
//! use gitforge::secrets::{SecretError, SecretStore};
//!
//! fn token(store: &dyn SecretStore) -> Result<String, SecretError> {
//!     // Err(NotFound) names <config-root>/gitlab/token
//!     store.require("gitlab", "token")
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors from credential lookups.
///
/// Note: Error messages intentionally do not include secret values.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The credential file does not exist (or is empty).
    #[error("no {key} found for forge {forge} in '{path}'")]
    NotFound {
        forge: String,
        key: String,
        path: PathBuf,
    },

    /// The credential file exists but could not be read.
    #[error("failed to read {key} for forge {forge} from '{path}'")]
    ReadError {
        forge: String,
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for credential providers.
pub trait SecretStore: Send + Sync {
    /// Get a credential.
    ///
    /// Returns `Ok(Some(value))` with surrounding whitespace trimmed.
    /// Returns `Ok(None)` if the credential does not exist.
    /// Returns `Err` if the store could not be read.
    ///
    /// # Security
    ///
    /// The returned value is the raw secret. Do not log or print it.
    fn get(&self, forge: &str, key: &str) -> Result<Option<String>, SecretError>;

    /// Where the credential is expected to live, for error messages.
    fn location(&self, forge: &str, key: &str) -> PathBuf;

    /// Get a credential that must exist.
    ///
    /// Default implementation maps `None` to `SecretError::NotFound`
    /// carrying [`SecretStore::location`].
    fn require(&self, forge: &str, key: &str) -> Result<String, SecretError> {
        self.get(forge, key)?.ok_or_else(|| SecretError::NotFound {
            forge: forge.to_string(),
            key: key.to_string(),
            path: self.location(forge, key),
        })
    }
}
