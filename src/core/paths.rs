//! core::paths
//!
//! Centralized path routing for gitforge storage locations.
//!
//! # Architecture
//!
//! There are exactly two roots, both resolved once at startup and passed
//! explicitly into the stores that use them:
//!
//! - **Config root**: credentials and the optional `config.toml`
//! - **Cache root**: per-forge changeset cache files
//!
//! No code outside this module should compute `*.join("gitforge-rofi")`
//! paths or consult the user directories directly.
//!
//! # Storage Layout
//!
//! ```text
//! <config-root>/config.toml
//! <config-root>/<forge>/token
//! <config-root>/<forge>/username
//! <cache-root>/<forge>-changesets.json
//! ```
//!
//! # Example
//!
//! ```
//! use gitforge::core::paths::{cache_file_path, credential_file_path, ForgePaths};
//! use std::path::PathBuf;
//!
//! let paths = ForgePaths::new(
//!     PathBuf::from("/home/me/.config/gitforge-rofi"),
//!     PathBuf::from("/home/me/.cache/gitforge-rofi"),
//! );
//!
//! assert_eq!(
//!     credential_file_path(&paths.config_root, "github", "token"),
//!     PathBuf::from("/home/me/.config/gitforge-rofi/github/token")
//! );
//! assert_eq!(
//!     cache_file_path(&paths.cache_root, "github"),
//!     PathBuf::from("/home/me/.cache/gitforge-rofi/github-changesets.json")
//! );
//! ```

use std::path::{Path, PathBuf};

use super::config::ConfigError;

/// Directory name used under the user's config and cache directories.
pub const APP_DIR_NAME: &str = "gitforge-rofi";

/// Environment variable overriding the config root.
pub const CONFIG_DIR_ENV: &str = "GITFORGE_CONFIG_DIR";

/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "GITFORGE_CACHE_DIR";

/// Resolved storage roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgePaths {
    /// Directory holding `config.toml` and per-forge credential files.
    pub config_root: PathBuf,
    /// Directory holding the per-forge cache files.
    pub cache_root: PathBuf,
}

impl ForgePaths {
    /// Create paths from explicit roots.
    pub fn new(config_root: PathBuf, cache_root: PathBuf) -> Self {
        Self {
            config_root,
            cache_root,
        }
    }

    /// Resolve the roots from the environment.
    ///
    /// Each root is taken from its override variable if set and non-empty,
    /// otherwise from the platform user directory, otherwise from
    /// `~/.config` / `~/.cache`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if neither the user directory nor
    /// the home directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_root = resolve_root(CONFIG_DIR_ENV, dirs::config_dir, ".config")?;
        let cache_root = resolve_root(CACHE_DIR_ENV, dirs::cache_dir, ".cache")?;
        Ok(Self::new(config_root, cache_root))
    }

    /// Path to the optional configuration file.
    ///
    /// This is `<config-root>/config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_root.join("config.toml")
    }
}

/// Credential file path for `key` of `forge` under `root`.
///
/// This is `<config-root>/<forge>/<key>`.
pub fn credential_file_path(root: &Path, forge: &str, key: &str) -> PathBuf {
    root.join(forge).join(key)
}

/// Cache file path for `forge` under `root`.
///
/// This is `<cache-root>/<forge>-changesets.json`.
pub fn cache_file_path(root: &Path, forge: &str) -> PathBuf {
    root.join(format!("{}-changesets.json", forge))
}

fn resolve_root(
    env_var: &str,
    user_dir: fn() -> Option<PathBuf>,
    home_fallback: &str,
) -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var(env_var) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    if let Some(dir) = user_dir() {
        return Ok(dir.join(APP_DIR_NAME));
    }

    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(home_fallback).join(APP_DIR_NAME))
}
