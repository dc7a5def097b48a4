//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! `<config-root>/config.toml`. The file is optional; every field has a
//! default.
//!
//! # Validation
//!
//! Config values are validated after parsing: the forge list must name
//! known forges without duplicates, and durations must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Contents of `config.toml`.
///
/// # Example
///
/// ```toml
/// forges = ["github", "gitlab"]
/// cache_ttl_minutes = 180
/// request_timeout_secs = 30
/// debug = false
///
/// [github]
/// graphql_url = "https://github.example.com/api/graphql"
///
/// [gitlab]
/// api_base = "https://gitlab.example.com/api/v4"
///
/// [menu]
/// theme = "Arc-Dark"
/// width = 70
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Active forges, in display order
    pub forges: Option<Vec<String>>,

    /// Cache freshness window in minutes
    pub cache_ttl_minutes: Option<u64>,

    /// Per-request deadline in seconds
    pub request_timeout_secs: Option<u64>,

    /// Print debug diagnostics on stderr
    pub debug: Option<bool>,

    /// Suppress warnings on stderr
    pub quiet: Option<bool>,

    /// GitHub settings
    pub github: Option<GitHubConfig>,

    /// GitLab settings
    pub gitlab: Option<GitLabConfig>,

    /// Menu launcher settings
    pub menu: Option<MenuConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(forges) = &self.forges {
            if forges.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "forges cannot be empty".to_string(),
                ));
            }

            let valid_forges = crate::forge::valid_forge_names();
            for (i, forge) in forges.iter().enumerate() {
                if !valid_forges.contains(&forge.as_str()) {
                    return Err(ConfigError::InvalidValue(format!(
                        "invalid forge '{}', must be one of: {}",
                        forge,
                        valid_forges.join(", ")
                    )));
                }
                if forges[..i].contains(forge) {
                    return Err(ConfigError::InvalidValue(format!(
                        "forge '{}' is listed more than once",
                        forge
                    )));
                }
            }
        }

        if self.cache_ttl_minutes == Some(0) {
            return Err(ConfigError::InvalidValue(
                "cache_ttl_minutes must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(menu) = &self.menu {
            menu.validate()?;
        }

        Ok(())
    }
}

/// GitHub settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// GraphQL endpoint (for GitHub Enterprise)
    pub graphql_url: Option<String>,
}

/// GitLab settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitLabConfig {
    /// REST API base (for self-hosted GitLab)
    pub api_base: Option<String>,
}

/// Menu launcher settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Launcher executable
    pub program: Option<String>,

    /// Launcher theme
    pub theme: Option<String>,

    /// Launcher window width
    pub width: Option<u32>,

    /// Prompt shown above the entries
    pub prompt: Option<String>,
}

impl MenuConfig {
    /// Validate the menu configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "menu.program cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
