//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! gitforge reads one optional file, `<config-root>/config.toml`. A missing
//! file is not an error; every setting has a default:
//!
//! | setting | default |
//! |---|---|
//! | `forges` | `["github"]` |
//! | `cache_ttl_minutes` | 180 |
//! | `request_timeout_secs` | 30 |
//! | `github.graphql_url` | `https://api.github.com/graphql` |
//! | `gitlab.api_base` | `https://gitlab.com/api/v4` |
//! | `menu.program` | `rofi` |
//! | `menu.theme` | `Arc-Dark` |
//! | `menu.width` | 70 |
//! | `menu.prompt` | `Gitforge changesets` |
//!
//! # Example
//!
//! ```no_run
//! use gitforge::core::config::Config;
//! use gitforge::core::paths::ForgePaths;
//!
//! let paths = ForgePaths::from_env().unwrap();
//! let config = Config::load(&paths).unwrap();
//!
//! for forge in config.forges() {
//!     println!("active forge: {}", forge);
//! }
//! println!("cache ttl: {:?}", config.cache_ttl());
//! ```

pub mod schema;

pub use schema::{FileConfig, GitHubConfig, GitLabConfig, MenuConfig};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::paths::ForgePaths;
use crate::ui::output::Verbosity;

/// Default active forge set.
pub const DEFAULT_FORGES: &[&str] = &["github"];

/// Default cache freshness window.
pub const DEFAULT_CACHE_TTL: Duration = crate::cache::DEFAULT_TTL;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = crate::forge::github::DEFAULT_GRAPHQL_URL;

/// Default GitLab REST API base.
pub const DEFAULT_GITLAB_API_BASE: &str = crate::forge::gitlab::DEFAULT_API_BASE;

/// Default menu launcher.
pub const DEFAULT_MENU_PROGRAM: &str = "rofi";

/// Default menu theme.
pub const DEFAULT_MENU_THEME: &str = "Arc-Dark";

/// Default menu width.
pub const DEFAULT_MENU_WIDTH: u32 = 70;

/// Default menu prompt.
pub const DEFAULT_MENU_PROMPT: &str = "Gitforge changesets";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    ReadError { path: PathBuf, source: io::Error },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents (defaults if the file is absent)
    pub file: FileConfig,
    /// Path the configuration was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load `config.toml` from the config root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// validated. A missing file yields the defaults.
    pub fn load(paths: &ForgePaths) -> Result<Self, ConfigError> {
        Self::load_from(&paths.config_file())
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Build a configuration from already-parsed contents.
    pub fn from_file_config(file: FileConfig) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self { file, path: None })
    }

    /// Path the configuration was loaded from, if a file was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Active forge names in display order.
    pub fn forges(&self) -> Vec<String> {
        match &self.file.forges {
            Some(forges) => forges.clone(),
            None => DEFAULT_FORGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Cache freshness window.
    pub fn cache_ttl(&self) -> Duration {
        self.file
            .cache_ttl_minutes
            .map(|m| Duration::from_secs(m * 60))
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        self.file
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Diagnostic verbosity.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(
            self.file.quiet.unwrap_or(false),
            self.file.debug.unwrap_or(false),
        )
    }

    /// GitHub GraphQL endpoint.
    pub fn github_graphql_url(&self) -> String {
        self.file
            .github
            .as_ref()
            .and_then(|g| g.graphql_url.clone())
            .unwrap_or_else(|| DEFAULT_GITHUB_GRAPHQL_URL.to_string())
    }

    /// GitLab REST API base, without a trailing slash.
    pub fn gitlab_api_base(&self) -> String {
        self.file
            .gitlab
            .as_ref()
            .and_then(|g| g.api_base.clone())
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITLAB_API_BASE.to_string())
    }

    /// Menu launcher executable.
    pub fn menu_program(&self) -> String {
        self.menu_setting(|m| m.program.clone())
            .unwrap_or_else(|| DEFAULT_MENU_PROGRAM.to_string())
    }

    /// Menu theme.
    pub fn menu_theme(&self) -> String {
        self.menu_setting(|m| m.theme.clone())
            .unwrap_or_else(|| DEFAULT_MENU_THEME.to_string())
    }

    /// Menu width.
    pub fn menu_width(&self) -> u32 {
        self.menu_setting(|m| m.width).unwrap_or(DEFAULT_MENU_WIDTH)
    }

    /// Menu prompt.
    pub fn menu_prompt(&self) -> String {
        self.menu_setting(|m| m.prompt.clone())
            .unwrap_or_else(|| DEFAULT_MENU_PROMPT.to_string())
    }

    fn menu_setting<T>(&self, get: impl Fn(&MenuConfig) -> Option<T>) -> Option<T> {
        self.file.menu.as_ref().and_then(get)
    }
}
