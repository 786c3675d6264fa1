//! # Stalesweep
//!
//! Finds stale, deletable branches in a GitHub repository.
//!
//! Stalesweep walks the branch listing of a repository and reports every
//! branch that is unprotected, not the default branch, not on the caller's
//! ignore list, not referenced by an open pull request, and whose head
//! commit is older than a configurable age threshold. It only *reports*;
//! acting on the list (deleting branches) is left to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stalesweep::{GithubClient, RepoId, StaleEvaluator};
//! use std::collections::HashSet;
//!
//! let repo: RepoId = "acme/widgets".parse()?;
//! let client = GithubClient::new(repo, token);
//! let stale = StaleEvaluator::new(client).deletable_branches(60, &HashSet::new())?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
// Current duplicates come from reqwest's transitive deps.
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod evaluate;
pub mod github;
pub mod observability;

// Re-exports for convenience
pub use evaluate::{Clock, StaleEvaluator, SystemClock};
pub use github::{Branch, BranchHead, BranchHost, GithubClient, RepoId};

/// Error type for stalesweep operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required upstream call returned a non-success HTTP status.
    ///
    /// Raised when:
    /// - The branch listing returns a non-2xx status
    /// - A pull-request lookup returns a non-2xx status
    /// - A commit lookup returns a non-2xx status
    ///
    /// The default-branch lookup is deliberately exempt: its failures
    /// degrade to an unknown default branch instead of raising.
    #[error("request to {url} failed with status {status}: {body}")]
    RemoteRequest {
        /// The URL of the failing request.
        url: String,
        /// The HTTP status code returned.
        status: u16,
        /// The verbatim response body, for diagnostics.
        body: String,
    },

    /// An HTTP request could not be performed at all.
    ///
    /// Raised when:
    /// - The connection cannot be established
    /// - The request times out
    /// - TLS negotiation fails
    #[error("request to {url} could not be sent: {cause}")]
    Transport {
        /// The URL of the failing request.
        url: String,
        /// The underlying cause.
        cause: String,
    },

    /// A success-status response did not match the expected shape.
    ///
    /// Raised when a response body fails to deserialize into the typed
    /// model of the endpoint.
    #[error("response from {url} could not be decoded: {cause}")]
    InvalidResponse {
        /// The URL of the request whose response was malformed.
        url: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A repository identifier is not of the form `owner/name`
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for stalesweep operations.
pub type Result<T> = std::result::Result<T, Error>;
