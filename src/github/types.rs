//! Typed models of the GitHub REST API responses.
//!
//! Responses are validated at the parse boundary: nested blocks that GitHub
//! may omit (committer, author, dates) are modeled as `Option` so that
//! missing-data handling is explicit in the callers instead of hidden
//! behind runtime defaults.

use crate::Error;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A repository identifier of the form `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// The account or organization owning the repository.
    pub owner: String,
    /// The repository name.
    pub name: String,
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((owner, name)) = s.split_once('/') else {
            return Err(Error::InvalidInput(format!(
                "repository must be of the form owner/name, got '{s}'"
            )));
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(Error::InvalidInput(format!(
                "repository must be of the form owner/name, got '{s}'"
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A branch record from the branch-listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    /// The branch name.
    pub name: String,
    /// Whether the hosting platform protects this branch.
    #[serde(default)]
    pub protected: bool,
    /// The head commit the branch currently points to.
    pub commit: BranchHead,
}

/// The head commit reference of a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchHead {
    /// The commit hash.
    pub sha: String,
    /// The API URL for the full commit detail.
    pub url: String,
}

/// Repository metadata from the repository endpoint.
///
/// Only the default branch is of interest; the field is optional so that
/// a malformed or error-shaped body degrades to `None` instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoInfo {
    /// The name of the repository's default branch, when known.
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A pull request associated with a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// The pull request state.
    pub state: PullState,
}

/// The lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullState {
    /// The pull request is open.
    Open,
    /// The pull request is closed (or merged).
    Closed,
    /// A state this client does not know about.
    #[serde(other)]
    Other,
}

/// Full commit detail fetched from a branch head's commit URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// The git-level commit metadata.
    pub commit: CommitMeta,
}

/// Git-level commit metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitMeta {
    /// The committer block, when present.
    #[serde(default)]
    pub committer: Option<GitActor>,
    /// The author block, when present.
    #[serde(default)]
    pub author: Option<GitActor>,
}

/// A committer or author block on a commit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitActor {
    /// The timestamp recorded for this actor, when present.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl CommitMeta {
    /// Returns the best available timestamp for the commit.
    ///
    /// Prefers the committer's date over the author's: a merge can bring in
    /// commits whose authored date is old even though they were applied
    /// recently. Returns `None` when neither block carries a date.
    #[must_use]
    pub fn best_date(&self) -> Option<DateTime<Utc>> {
        self.committer
            .as_ref()
            .and_then(|c| c.date)
            .or_else(|| self.author.as_ref().and_then(|a| a.date))
    }
}
