//! forge::gitlab
//!
//! GitLab client using the REST merge request API.
//!
//! # Design
//!
//! Two scoped listings, `created_by_me` then `assigned_to_me`, each a GET to
//! `<api-base>/merge_requests?state=opened&scope=<scope>`. Pages are followed
//! through the `x-next-page` header up to [`MAX_PAGES`] per scope; a scope
//! cut short by the cap is reported as a warning. The normalizer concatenates
//! the scopes in that order without deduplication.
//!
//! Self-hosted instances are supported through the configurable API base.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::forge::gitlab::GitLabClient;
//!
//! let client = GitLabClient::new(http, secrets)
//!     .with_api_base("https://gitlab.example.com/api/v4");
//! let records = client.fetch("gitlab").await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;

use super::http;
use super::traits::{ForgeError, RemoteClient};
use crate::core::types::ChangesetRecord;
use crate::secrets::SecretStore;
use crate::ui::output::{self, Verbosity};

/// Default GitLab API base URL.
pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";

/// Scopes queried, in display order.
pub const SCOPES: [&str; 2] = ["created_by_me", "assigned_to_me"];

/// Upper bound on pages followed per scope.
pub const MAX_PAGES: u32 = 10;

/// Merge requests requested per page.
const PER_PAGE: u32 = 100;

/// Pagination header naming the next page; empty on the last page.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// GitLab REST client.
pub struct GitLabClient {
    /// HTTP client for making requests
    client: Client,
    /// Source of the token
    secrets: Arc<dyn SecretStore>,
    /// API base URL, without trailing slash
    api_base: String,
    /// Verbosity for pagination warnings
    verbosity: Verbosity,
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitLabClient {
    /// Create a client against gitlab.com.
    pub fn new(client: Client, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            client,
            secrets,
            api_base: DEFAULT_API_BASE.to_string(),
            verbosity: Verbosity::default(),
        }
    }

    /// Set the verbosity for warnings.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Use a different API base (self-hosted GitLab).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// List every open merge request in `scope`.
    async fn list_scope(
        &self,
        token: &str,
        scope: &str,
    ) -> Result<Vec<MergeRequest>, ForgeError> {
        let url = format!("{}/merge_requests", self.api_base);
        let what = format!("GitLab {} merge requests", scope);
        let per_page = PER_PAGE.to_string();

        let mut merge_requests = Vec::new();
        let mut page = 1u32;
        let mut fetched = 0u32;

        loop {
            let page_param = page.to_string();
            let response = self
                .client
                .get(&url)
                .bearer_auth(token)
                .query(&[
                    ("state", "opened"),
                    ("scope", scope),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ForgeError::transport(format!("failed to list {}", what), e))?;

            let next = next_page(&response);
            let batch: Vec<MergeRequest> = http::read_json(response, &what).await?;
            merge_requests.extend(batch);
            fetched += 1;

            match step(page, next, fetched) {
                PageStep::Fetch(n) => page = n,
                PageStep::Done => break,
                PageStep::Capped => {
                    output::warn(
                        format!(
                            "{} stopped after {} pages; older merge requests are not listed",
                            what, MAX_PAGES
                        ),
                        self.verbosity,
                    );
                    break;
                }
            }
        }

        Ok(merge_requests)
    }
}

/// What to do after a page has been read.
#[derive(Debug, PartialEq, Eq)]
enum PageStep {
    /// Request this page next.
    Fetch(u32),
    /// No further page announced.
    Done,
    /// A further page is announced but the cap is reached.
    Capped,
}

fn step(page: u32, next: Option<u32>, fetched: u32) -> PageStep {
    match next {
        Some(n) if n > page && fetched >= MAX_PAGES => PageStep::Capped,
        Some(n) if n > page => PageStep::Fetch(n),
        _ => PageStep::Done,
    }
}

/// Read the next page number, if the response announces one.
fn next_page(response: &Response) -> Option<u32> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

// REST wire types

#[derive(Debug, Deserialize)]
struct MergeRequest {
    iid: u64,
    title: String,
    web_url: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    source_branch: String,
    references: Option<References>,
}

#[derive(Debug, Deserialize)]
struct References {
    full: String,
}

impl MergeRequest {
    fn into_record(self, forge: &str) -> ChangesetRecord {
        let parsed = self
            .references
            .as_ref()
            .and_then(|r| parse_reference(&r.full));

        let (repo, number) = match parsed {
            Some((repo, number)) => (repo, number),
            None => (
                project_path_from_web_url(&self.web_url).unwrap_or_default(),
                self.iid,
            ),
        };

        ChangesetRecord {
            repo,
            number,
            title: self.title,
            url: self.web_url,
            source_branch: self.source_branch,
            created_at: self.created_at,
            forge: forge.to_string(),
        }
    }
}

/// Split a full reference like `group/sub/project!42` into path and number.
fn parse_reference(full: &str) -> Option<(String, u64)> {
    let (path, number) = full.rsplit_once('!')?;
    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), number.parse().ok()?))
}

/// Extract the project path from a merge request web URL.
///
/// Handles nested groups: everything between the host and `/-/` is the path.
fn project_path_from_web_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (_host, path) = rest.split_once('/')?;
    let (project, _) = path.split_once("/-/")?;
    if project.is_empty() {
        return None;
    }
    Some(project.to_string())
}

/// Concatenate scopes in order.
fn normalize(scopes: Vec<Vec<MergeRequest>>, forge: &str) -> Vec<ChangesetRecord> {
    scopes
        .into_iter()
        .flatten()
        .map(|mr| mr.into_record(forge))
        .collect()
}

#[async_trait]
impl RemoteClient for GitLabClient {
    async fn fetch(&self, forge: &str) -> Result<Vec<ChangesetRecord>, ForgeError> {
        let token = self.secrets.require(forge, "token")?;

        let mut scopes = Vec::with_capacity(SCOPES.len());
        for scope in SCOPES {
            scopes.push(self.list_scope(&token, scope).await?);
        }

        Ok(normalize(scopes, forge))
    }
}
