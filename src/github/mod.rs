//! GitHub integration.
//!
//! The transport lives behind the [`BranchHost`] trait so that the
//! evaluation logic can be exercised against an in-memory implementation
//! in tests while production code talks to the real API.

mod client;
mod types;

pub use client::GithubClient;
pub use types::{
    Branch, BranchHead, CommitDetail, CommitMeta, GitActor, PullRequest, PullState, RepoId,
    RepoInfo,
};

use crate::Result;
use chrono::{DateTime, Utc};

/// Read access to the branch metadata of a hosted repository.
pub trait BranchHost {
    /// Returns the repository's default branch name, when it can be
    /// determined.
    ///
    /// This lookup is tolerant: any failure degrades to `None` rather than
    /// an error, so an unreachable repository endpoint only disables the
    /// default-branch exclusion.
    fn default_branch(&self) -> Option<String>;

    /// Lists the repository's branches, in the order the host returns them.
    ///
    /// Only the first page is read; no pagination parameters are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn branches(&self) -> Result<Vec<Branch>>;

    /// Returns whether any open pull request references the given commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull-request lookup fails.
    fn has_open_pull(&self, sha: &str) -> Result<bool>;

    /// Returns the timestamp of a branch's head commit.
    ///
    /// Prefers the committer date, falling back to the author date.
    /// `Ok(None)` means the commit carries no usable date at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit lookup fails.
    fn head_commit_date(&self, head: &BranchHead) -> Result<Option<DateTime<Utc>>>;
}
