//! Integration tests for multi-forge support.
//!
//! These tests verify:
//! - Provider names and parsing
//! - Configuration-driven forge selection and ordering
//! - Factory error handling for unknown forges
//! - That every configured forge is driven through the same capability

use std::sync::Arc;

use gitforge::cache::{MemoryCacheStore, DEFAULT_TTL};
use gitforge::core::config::Config;
use gitforge::core::paths::ForgePaths;
use gitforge::engine::Dispatcher;
use gitforge::forge::{
    create_forges, create_forges_with, valid_forge_names, ForgeDeps, ForgeError, ForgeProvider,
};
use gitforge::secrets::FileSecretStore;
use gitforge::ui::output::Verbosity;
use tempfile::TempDir;

fn deps(temp: &TempDir) -> (MemoryCacheStore, ForgeDeps) {
    let cache = MemoryCacheStore::new(DEFAULT_TTL);
    let deps = ForgeDeps {
        http: reqwest::Client::new(),
        secrets: Arc::new(FileSecretStore::new(temp.path().to_path_buf())),
        cache: Arc::new(cache.clone()),
        verbosity: Verbosity::Quiet,
    };
    (cache, deps)
}

fn config_from(toml: &str) -> Config {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, toml).unwrap();
    Config::load_from(&path).unwrap()
}

mod providers {
    use super::*;

    #[test]
    fn github_and_gitlab_are_available() {
        assert_eq!(ForgeProvider::all().len(), 2);
        assert_eq!(ForgeProvider::parse("github"), Some(ForgeProvider::GitHub));
        assert_eq!(ForgeProvider::parse("gitlab"), Some(ForgeProvider::GitLab));
    }

    #[test]
    fn unknown_provider_returns_none() {
        assert_eq!(ForgeProvider::parse("bitbucket"), None);
        assert_eq!(ForgeProvider::parse(""), None);
    }

    #[test]
    fn valid_names_match_providers() {
        let names: Vec<&str> = ForgeProvider::all().iter().map(|p| p.name()).collect();
        assert_eq!(names, valid_forge_names());
    }
}

mod selection {
    use super::*;

    #[test]
    fn default_is_github() {
        let temp = TempDir::new().unwrap();
        let (_cache, deps) = deps(&temp);

        let forges = create_forges_with(&Config::default(), &deps).unwrap();

        let names: Vec<&str> = forges.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["github"]);
    }

    #[test]
    fn configured_order_is_kept() {
        let temp = TempDir::new().unwrap();
        let (_cache, deps) = deps(&temp);
        let config = config_from(r#"forges = ["gitlab", "github"]"#);

        let forges = create_forges_with(&config, &deps).unwrap();

        let names: Vec<&str> = forges.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["gitlab", "github"]);
    }

    #[test]
    fn unvalidated_unknown_forge_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (_cache, deps) = deps(&temp);
        let mut config = Config::default();
        config.file.forges = Some(vec!["bitbucket".to_string()]);

        let err = create_forges_with(&config, &deps).err().unwrap();

        assert!(matches!(err, ForgeError::Protocol(_)));
        assert!(err.to_string().contains("bitbucket"));
    }

    #[test]
    fn production_deps_touch_nothing_on_disk() {
        let temp = TempDir::new().unwrap();
        let paths = ForgePaths::new(temp.path().join("config"), temp.path().join("cache"));
        let config = config_from(r#"forges = ["github", "gitlab"]"#);

        let forges = create_forges(&config, &paths).unwrap();

        assert_eq!(forges.len(), 2);
        assert!(!paths.config_root.exists());
        assert!(!paths.cache_root.exists());
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_name_the_forge_and_path() {
        let temp = TempDir::new().unwrap();
        let (cache, deps) = deps(&temp);
        let config = config_from(r#"forges = ["gitlab", "github"]"#);
        let dispatcher = Dispatcher::new(create_forges_with(&config, &deps).unwrap(), "P");
        let mut out: Vec<u8> = Vec::new();

        let err = dispatcher.list(&mut out).await.unwrap_err();

        assert_eq!(err.forge(), Some("gitlab"));
        let cause = std::error::Error::source(&err).unwrap().to_string();
        let expected = temp.path().join("gitlab").join("token");
        assert!(cause.contains(&expected.display().to_string()));
        assert_eq!(cache.write_count(), 0);
        assert!(String::from_utf8(out).unwrap().ends_with("refresh\n"));
    }
}
