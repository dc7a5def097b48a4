//! secrets::file_store
//!
//! File-based credential storage.
//!
//! # Layout
//!
//! One file per credential: `<config-root>/<forge>/<key>`, for example
//! `~/.config/gitforge-rofi/github/token`. The store never writes; the user
//! creates these files.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::secrets::{FileSecretStore, SecretStore};
//!
//! let store = FileSecretStore::new(config_root);
//! let user = store.require("github", "username")?;
//! let token = store.require("github", "token")?;
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use super::traits::{SecretError, SecretStore};
use crate::core::paths::{credential_file_path, ForgePaths};

/// File-based credential store.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    /// Config root holding one directory per forge
    root: PathBuf,
}

impl FileSecretStore {
    /// Create a store reading from `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create a store reading from the config root of `paths`.
    pub fn from_paths(paths: &ForgePaths) -> Self {
        Self::new(paths.config_root.clone())
    }

    /// Get the config root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, forge: &str, key: &str) -> Result<Option<String>, SecretError> {
        let path = self.location(forge, key);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SecretError::ReadError {
                    forge: forge.to_string(),
                    key: key.to_string(),
                    path,
                    source: e,
                })
            }
        };

        let value = raw.trim();
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value.to_string()))
        }
    }

    fn location(&self, forge: &str, key: &str) -> PathBuf {
        credential_file_path(&self.root, forge, key)
    }
}
