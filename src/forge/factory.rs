//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! The CLI builds its forge set through [`create_forges`] instead of naming
//! concrete clients, so the dispatcher only ever sees `dyn Forge`. All
//! forges share one HTTP client, one secret store, and one cache store.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::core::{config::Config, paths::ForgePaths};
//! use gitforge::forge::create_forges;
//!
//! let paths = ForgePaths::from_env()?;
//! let config = Config::load(&paths)?;
//! for forge in create_forges(&config, &paths)? {
//!     forge.refresh().await?;
//! }
//! ```

use std::sync::Arc;

use reqwest::Client;

use super::cached::CachedForge;
use super::github::GitHubClient;
use super::gitlab::GitLabClient;
use super::http;
use super::traits::{Forge, ForgeError};
use crate::cache::{CacheStore, FileCacheStore};
use crate::core::config::Config;
use crate::core::paths::ForgePaths;
use crate::secrets::{FileSecretStore, SecretStore};
use crate::ui::output::Verbosity;

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    /// GitHub (GraphQL search)
    GitHub,
    /// GitLab (REST merge requests)
    GitLab,
}

impl ForgeProvider {
    /// Get all providers.
    ///
    /// # Example
    ///
    /// ```
    /// use gitforge::forge::ForgeProvider;
    ///
    /// let providers = ForgeProvider::all();
    /// assert!(providers.contains(&ForgeProvider::GitHub));
    /// ```
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitHub, ForgeProvider::GitLab]
    }

    /// Get the provider name as a string.
    ///
    /// This is the name used in configuration files, credential directories
    /// and cache file names.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
            ForgeProvider::GitLab => "gitlab",
        }
    }

    /// Parse a provider from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use gitforge::forge::ForgeProvider;
    ///
    /// assert_eq!(ForgeProvider::parse("gitlab"), Some(ForgeProvider::GitLab));
    /// assert_eq!(ForgeProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            "gitlab" => Some(ForgeProvider::GitLab),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Get the forge names accepted in configuration.
pub fn valid_forge_names() -> &'static [&'static str] {
    &["github", "gitlab"]
}

/// Shared dependencies of every forge in one invocation.
#[derive(Clone)]
pub struct ForgeDeps {
    /// HTTP client with timeout and user agent
    pub http: Client,
    /// Credential source
    pub secrets: Arc<dyn SecretStore>,
    /// Changeset cache
    pub cache: Arc<dyn CacheStore>,
    /// Diagnostic verbosity
    pub verbosity: Verbosity,
}

impl ForgeDeps {
    /// Build the production dependencies from configuration and paths.
    pub fn from_config(config: &Config, paths: &ForgePaths) -> Result<Self, ForgeError> {
        Ok(Self {
            http: http::build_client(config.request_timeout())?,
            secrets: Arc::new(FileSecretStore::from_paths(paths)),
            cache: Arc::new(FileCacheStore::new(
                paths.cache_root.clone(),
                config.cache_ttl(),
            )),
            verbosity: config.verbosity(),
        })
    }
}

/// Create a single forge.
pub fn create_forge(provider: ForgeProvider, config: &Config, deps: &ForgeDeps) -> Box<dyn Forge> {
    let name = provider.name();
    match provider {
        ForgeProvider::GitHub => {
            let client = GitHubClient::new(deps.http.clone(), deps.secrets.clone())
                .with_graphql_url(config.github_graphql_url());
            Box::new(
                CachedForge::new(name, client, deps.cache.clone()).with_verbosity(deps.verbosity),
            )
        }
        ForgeProvider::GitLab => {
            let client = GitLabClient::new(deps.http.clone(), deps.secrets.clone())
                .with_api_base(config.gitlab_api_base())
                .with_verbosity(deps.verbosity);
            Box::new(
                CachedForge::new(name, client, deps.cache.clone()).with_verbosity(deps.verbosity),
            )
        }
    }
}

/// Create the configured forges, in configuration order.
///
/// # Errors
///
/// Returns `ForgeError::Protocol` for an unknown forge name (configuration
/// validation normally rejects these first) and `ForgeError::Transport` if
/// the HTTP client cannot be built.
pub fn create_forges(config: &Config, paths: &ForgePaths) -> Result<Vec<Box<dyn Forge>>, ForgeError> {
    let deps = ForgeDeps::from_config(config, paths)?;
    create_forges_with(config, &deps)
}

/// Create the configured forges over explicit dependencies.
pub fn create_forges_with(
    config: &Config,
    deps: &ForgeDeps,
) -> Result<Vec<Box<dyn Forge>>, ForgeError> {
    config
        .forges()
        .iter()
        .map(|name| {
            let provider = ForgeProvider::parse(name).ok_or_else(|| {
                ForgeError::Protocol(format!(
                    "unknown forge '{}', must be one of: {}",
                    name,
                    valid_forge_names().join(", ")
                ))
            })?;
            Ok(create_forge(provider, config, deps))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCacheStore, DEFAULT_TTL};
    use crate::core::config::schema::FileConfig;
    use std::time::Duration;

    fn deps(dir: &std::path::Path) -> ForgeDeps {
        ForgeDeps {
            http: Client::new(),
            secrets: Arc::new(FileSecretStore::new(dir.to_path_buf())),
            cache: Arc::new(MemoryCacheStore::new(DEFAULT_TTL)),
            verbosity: Verbosity::Quiet,
        }
    }

    mod forge_provider {
        use super::*;

        #[test]
        fn all_includes_both() {
            assert_eq!(
                ForgeProvider::all(),
                &[ForgeProvider::GitHub, ForgeProvider::GitLab]
            );
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(ForgeProvider::parse("GitHub"), Some(ForgeProvider::GitHub));
            assert_eq!(ForgeProvider::parse("GITLAB"), Some(ForgeProvider::GitLab));
            assert_eq!(ForgeProvider::parse("bitbucket"), None);
        }

        #[test]
        fn display_matches_name() {
            for provider in ForgeProvider::all() {
                assert_eq!(provider.to_string(), provider.name());
                assert_eq!(ForgeProvider::parse(provider.name()), Some(*provider));
            }
        }

        #[test]
        fn names_are_valid_config_names() {
            for provider in ForgeProvider::all() {
                assert!(valid_forge_names().contains(&provider.name()));
            }
        }
    }

    #[test]
    fn create_forges_follows_config_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file_config(FileConfig {
            forges: Some(vec!["gitlab".to_string(), "github".to_string()]),
            ..Default::default()
        })
        .unwrap();

        let forges = create_forges_with(&config, &deps(dir.path())).unwrap();

        let names: Vec<&str> = forges.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["gitlab", "github"]);
    }

    #[test]
    fn default_config_is_github_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let forges = create_forges_with(&config, &deps(dir.path())).unwrap();

        assert_eq!(forges.len(), 1);
        assert_eq!(forges[0].name(), "github");
    }

    #[test]
    fn deps_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ForgePaths::new(dir.path().join("config"), dir.path().join("cache"));
        let config = Config::from_file_config(FileConfig {
            request_timeout_secs: Some(5),
            ..Default::default()
        })
        .unwrap();

        let forges = create_forges(&config, &paths).unwrap();

        assert_eq!(forges.len(), 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(!paths.cache_root.exists());
    }
}
