//! forge::github
//!
//! GitHub client using the GraphQL search API.
//!
//! # Design
//!
//! A single POST carries four aliased searches, one per relationship the
//! user has with a pull request:
//!
//! | alias | qualifier |
//! |---|---|
//! | `requests` | `review-requested:<user>` |
//! | `created` | `author:<user>` |
//! | `mentions` | `mentions:<user>` |
//! | `assigned` | `assigned:<user>` |
//!
//! The normalizer flattens the buckets in that order. A pull request that
//! appears in several buckets appears several times.
//!
//! # Authentication
//!
//! Basic auth with `username:token`, both read from the secret store under
//! the forge name.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::forge::github::GitHubClient;
//! use gitforge::forge::RemoteClient;
//!
//! let client = GitHubClient::new(http, secrets);
//! let records = client.fetch("github").await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http;
use super::traits::{ForgeError, RemoteClient};
use crate::core::types::ChangesetRecord;
use crate::secrets::SecretStore;

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Accept header sent with the search request.
const ACCEPT_VALUE: &str = "application/vnd.github.v3+json";

/// Results per search bucket.
const PAGE_SIZE: u32 = 100;

/// Search buckets as `(alias, qualifier)`, in display order.
pub const SEARCH_BUCKETS: [(&str, &str); 4] = [
    ("requests", "review-requested"),
    ("created", "author"),
    ("mentions", "mentions"),
    ("assigned", "assigned"),
];

/// GitHub GraphQL client.
pub struct GitHubClient {
    /// HTTP client for making requests
    client: Client,
    /// Source of the username and token
    secrets: Arc<dyn SecretStore>,
    /// GraphQL endpoint (configurable for GitHub Enterprise)
    graphql_url: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}

impl GitHubClient {
    /// Create a client against the public GitHub endpoint.
    pub fn new(client: Client, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            client,
            secrets,
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }

    /// Use a different GraphQL endpoint.
    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = url.into();
        self
    }

    /// Get the GraphQL endpoint.
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }
}

/// Build the search document for `user`.
pub fn search_document(user: &str) -> String {
    let searches: Vec<String> = SEARCH_BUCKETS
        .iter()
        .map(|(alias, qualifier)| search_field(alias, &format!("{}:{}", qualifier, user)))
        .collect();
    format!("{{\n{}\n}}", searches.join("\n"))
}

fn search_field(alias: &str, qualifier: &str) -> String {
    format!(
        r#"  {alias}: search(query: "is:open is:pr {qualifier} archived:false", type: ISSUE, first: {PAGE_SIZE}) {{
    nodes {{
      ... on PullRequest {{
        number
        url
        state
        title
        createdAt
        repository {{
          nameWithOwner
        }}
        headRef {{
          name
        }}
      }}
    }}
  }}"#
    )
}

// GraphQL wire types

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
struct SearchData {
    requests: SearchNodes,
    created: SearchNodes,
    mentions: SearchNodes,
    assigned: SearchNodes,
}

#[derive(Deserialize)]
struct SearchNodes {
    #[serde(default)]
    nodes: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    url: String,
    title: String,
    created_at: DateTime<Utc>,
    repository: Repository,
    head_ref: Option<HeadRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Repository {
    name_with_owner: String,
}

#[derive(Deserialize)]
struct HeadRef {
    name: String,
}

impl PullRequestNode {
    fn into_record(self, forge: &str) -> ChangesetRecord {
        ChangesetRecord {
            repo: self.repository.name_with_owner,
            number: self.number,
            title: self.title,
            url: self.url,
            source_branch: self.head_ref.map(|r| r.name).unwrap_or_default(),
            created_at: self.created_at,
            forge: forge.to_string(),
        }
    }
}

/// Flatten the buckets in display order.
///
/// Search hits that are not pull requests come back as `null` or as objects
/// without a `number` and are skipped. Every other node must decode.
fn normalize(data: SearchData, forge: &str) -> Result<Vec<ChangesetRecord>, ForgeError> {
    let mut records = Vec::new();
    for bucket in [data.requests, data.created, data.mentions, data.assigned] {
        for node in bucket.nodes {
            if node.get("number").is_none() {
                continue;
            }
            let pr: PullRequestNode = serde_json::from_value(node)
                .map_err(|e| ForgeError::format("failed to parse GitHub pull request", e))?;
            records.push(pr.into_record(forge));
        }
    }
    Ok(records)
}

fn into_search_data(response: GraphQLResponse) -> Result<SearchData, ForgeError> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ForgeError::Protocol(format!(
            "GraphQL errors: {}",
            messages.join("; ")
        )));
    }
    response
        .data
        .ok_or_else(|| ForgeError::Protocol("GraphQL response has no data".to_string()))
}

#[async_trait]
impl RemoteClient for GitHubClient {
    async fn fetch(&self, forge: &str) -> Result<Vec<ChangesetRecord>, ForgeError> {
        let user = self.secrets.require(forge, "username")?;
        let token = self.secrets.require(forge, "token")?;

        let query = search_document(&user);
        let response = self
            .client
            .post(&self.graphql_url)
            .basic_auth(&user, Some(&token))
            .header(ACCEPT, ACCEPT_VALUE)
            .json(&GraphQLRequest { query: &query })
            .send()
            .await
            .map_err(|e| ForgeError::transport("failed to send GitHub search request", e))?;

        let response: GraphQLResponse = http::read_json(response, "GitHub search").await?;
        normalize(into_search_data(response)?, forge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::FileSecretStore;
    use proptest::prelude::*;
    use serde_json::json;

    fn node(repo: &str, number: u64) -> serde_json::Value {
        json!({
            "number": number,
            "url": format!("https://github.com/{}/pull/{}", repo, number),
            "state": "OPEN",
            "title": format!("PR {}", number),
            "createdAt": "2024-05-01T12:00:00Z",
            "repository": { "nameWithOwner": repo },
            "headRef": { "name": format!("branch-{}", number) }
        })
    }

    fn data(
        requests: Vec<serde_json::Value>,
        created: Vec<serde_json::Value>,
        mentions: Vec<serde_json::Value>,
        assigned: Vec<serde_json::Value>,
    ) -> SearchData {
        serde_json::from_value(json!({
            "requests": { "nodes": requests },
            "created": { "nodes": created },
            "mentions": { "nodes": mentions },
            "assigned": { "nodes": assigned },
        }))
        .unwrap()
    }

    fn keys(records: &[ChangesetRecord]) -> Vec<String> {
        records.iter().map(ChangesetRecord::key).collect()
    }

    #[test]
    fn document_has_all_buckets_in_order() {
        let doc = search_document("octocat");

        let positions: Vec<usize> = [
            "requests: search(query: \"is:open is:pr review-requested:octocat archived:false\"",
            "created: search(query: \"is:open is:pr author:octocat archived:false\"",
            "mentions: search(query: \"is:open is:pr mentions:octocat archived:false\"",
            "assigned: search(query: \"is:open is:pr assigned:octocat archived:false\"",
        ]
        .iter()
        .map(|needle| doc.find(needle).expect(needle))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(doc.matches("type: ISSUE, first: 100").count(), 4);
        assert!(doc.contains("nameWithOwner"));
        assert!(doc.contains("headRef"));
        assert!(doc.starts_with('{'));
        assert!(doc.ends_with('}'));
    }

    #[test]
    fn normalize_orders_buckets() {
        let records = normalize(
            data(
                vec![node("a/a", 1)],
                vec![node("b/b", 2)],
                vec![],
                vec![node("c/c", 3)],
            ),
            "github",
        )
        .unwrap();

        assert_eq!(keys(&records), vec!["a/a#1", "b/b#2", "c/c#3"]);
        assert!(records.iter().all(|r| r.forge == "github"));
        assert_eq!(records[0].source_branch, "branch-1");
        assert_eq!(records[0].url, "https://github.com/a/a/pull/1");
    }

    #[test]
    fn normalize_keeps_duplicates() {
        let records = normalize(
            data(vec![node("a/a", 1)], vec![node("a/a", 1)], vec![], vec![]),
            "github",
        )
        .unwrap();
        assert_eq!(keys(&records), vec!["a/a#1", "a/a#1"]);
    }

    #[test]
    fn null_head_ref_is_empty_branch() {
        let mut n = node("a/a", 1);
        n["headRef"] = serde_json::Value::Null;

        let records = normalize(data(vec![n], vec![], vec![], vec![]), "github").unwrap();

        assert_eq!(records[0].source_branch, "");
    }

    #[test]
    fn null_and_empty_nodes_are_skipped() {
        let records = normalize(
            data(vec![serde_json::Value::Null, json!({})], vec![], vec![], vec![]),
            "github",
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_pull_request_is_format_error() {
        let mut bad_date = node("a/a", 1);
        bad_date["createdAt"] = json!("not-a-date");
        let mut no_repo = node("b/b", 2);
        no_repo.as_object_mut().unwrap().remove("repository");
        let mut null_number = node("c/c", 3);
        null_number["number"] = serde_json::Value::Null;

        for bad in [bad_date, no_repo, null_number] {
            let bucket = vec![node("ok/ok", 9), bad];
            let result = normalize(data(bucket, vec![], vec![], vec![]), "github");
            assert!(matches!(result, Err(ForgeError::Format { .. })));
        }
    }

    #[test]
    fn graphql_errors_are_protocol_errors() {
        let response: GraphQLResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Something went wrong" }]
        }))
        .unwrap();

        let err = into_search_data(response).err().unwrap();
        assert!(matches!(err, ForgeError::Protocol(ref m) if m.contains("Something went wrong")));
    }

    #[test]
    fn missing_data_is_protocol_error() {
        let response: GraphQLResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            into_search_data(response),
            Err(ForgeError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn missing_username_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = Arc::new(FileSecretStore::new(dir.path().to_path_buf()));
        let client = GitHubClient::new(Client::new(), secrets);

        let err = client.fetch("github").await.unwrap_err();

        assert!(matches!(err, ForgeError::Configuration(_)));
        let expected = dir.path().join("github").join("username");
        assert!(err.to_string().contains(&expected.display().to_string()));
    }

    #[test]
    fn debug_hides_secrets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("github")).unwrap();
        std::fs::write(dir.path().join("github").join("username"), "octocat").unwrap();
        std::fs::write(dir.path().join("github").join("token"), "ghp_supersecret").unwrap();
        let secrets = Arc::new(FileSecretStore::new(dir.path().to_path_buf()));

        let client = GitHubClient::new(Client::new(), secrets)
            .with_graphql_url("https://ghe.example.com/api/graphql");
        let debug = format!("{:?}", client);

        assert!(debug.contains("ghe.example.com"));
        assert!(!debug.contains("ghp_supersecret"));
        assert!(!debug.contains("octocat"));
        assert_eq!(client.graphql_url(), "https://ghe.example.com/api/graphql");
    }

    proptest! {
        #[test]
        fn flattening_preserves_bucket_order(
            sizes in proptest::collection::vec(0usize..6, 4)
        ) {
            let mut number = 0u64;
            let mut buckets: Vec<Vec<serde_json::Value>> = Vec::new();
            let mut expected = Vec::new();
            for size in &sizes {
                let mut bucket = Vec::new();
                for _ in 0..*size {
                    number += 1;
                    bucket.push(node("o/r", number));
                    expected.push(format!("o/r#{}", number));
                }
                buckets.push(bucket);
            }
            let assigned = buckets.pop().unwrap();
            let mentions = buckets.pop().unwrap();
            let created = buckets.pop().unwrap();
            let requests = buckets.pop().unwrap();

            let records =
                normalize(data(requests, created, mentions, assigned), "github").unwrap();

            prop_assert_eq!(records.len(), sizes.iter().sum::<usize>());
            prop_assert_eq!(keys(&records), expected);
        }
    }
}
