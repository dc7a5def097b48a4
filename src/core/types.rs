//! core::types
//!
//! The normalized changeset record shared by every forge.
//!
//! # Types
//!
//! - [`ChangesetRecord`] - One open pull/merge request, as shown in the menu
//!
//! # Equality
//!
//! Two records are equal when they describe the same changeset content.
//! The producing forge is menu metadata and does not take part in equality,
//! so a GitHub record compares equal to an identical record served from a
//! different forge binding or read back from the cache.
//!
//! # Example
//!
//! ```
//! use gitforge::core::types::ChangesetRecord;
//!
//! let record = ChangesetRecord {
//!     repo: "octocat/hello-world".to_string(),
//!     number: 42,
//!     title: "Add feature".to_string(),
//!     url: "https://github.com/octocat/hello-world/pull/42".to_string(),
//!     source_branch: "feature".to_string(),
//!     created_at: "2024-05-01T12:00:00Z".parse().unwrap(),
//!     forge: "github".to_string(),
//! };
//!
//! assert_eq!(record.key(), "octocat/hello-world#42");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A changeset (pull request or merge request) normalized across forges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangesetRecord {
    /// Qualified repository name ("owner/repo", or the full GitLab project path).
    /// Unique within a forge, not globally.
    pub repo: String,
    /// Forge-local changeset number.
    pub number: u64,
    /// Changeset title.
    pub title: String,
    /// Canonical web URL, used as the "open" target.
    pub url: String,
    /// Source (head) branch name. Empty when the branch no longer exists.
    pub source_branch: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Name of the forge that produced this record.
    pub forge: String,
}

impl ChangesetRecord {
    /// Menu key: `<repo>#<number>`.
    pub fn key(&self) -> String {
        format!("{}#{}", self.repo, self.number)
    }
}

impl PartialEq for ChangesetRecord {
    fn eq(&self, other: &Self) -> bool {
        self.repo == other.repo
            && self.number == other.number
            && self.title == other.title
            && self.url == other.url
            && self.source_branch == other.source_branch
            && self.created_at == other.created_at
    }
}

impl Eq for ChangesetRecord {}
