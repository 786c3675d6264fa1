//! Blocking HTTP client for the GitHub REST API.

use super::BranchHost;
use super::types::{Branch, BranchHead, CommitDetail, PullRequest, PullState, RepoId, RepoInfo};
use crate::config::{build_http_client, HttpConfig};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

/// GitHub API client scoped to a single repository.
pub struct GithubClient {
    /// The repository all requests are scoped to.
    repo: RepoId,
    /// Access token, sent as a bearer credential.
    token: SecretString,
    /// API endpoint.
    endpoint: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GithubClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.github.com";

    /// Media type required by the commit-pulls preview endpoint.
    const PULLS_ACCEPT: &'static str = "application/vnd.github.groot-preview+json";

    /// Creates a new client for the given repository.
    #[must_use]
    pub fn new(repo: RepoId, token: impl Into<String>) -> Self {
        Self {
            repo,
            token: SecretString::from(token.into()),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            client: build_http_client(HttpConfig::from_env()),
        }
    }

    /// Sets the API endpoint (GitHub Enterprise, test servers).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}", self.endpoint, self.repo)
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(url)
            .header(
                "authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("content-type", "application/json")
    }

    /// Sends a request and enforces a success status.
    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::blocking::Response> {
        let response = request.send().map_err(|e| {
            tracing::error!(url = %url, error = %e, "Request could not be sent");
            Error::Transport {
                url: url.to_string(),
                cause: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                url = %url,
                status = status.as_u16(),
                body = %body,
                "GitHub API returned error status"
            );
            return Err(Error::RemoteRequest {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(url: &str, response: reqwest::blocking::Response) -> Result<T> {
        response.json().map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to decode response");
            Error::InvalidResponse {
                url: url.to_string(),
                cause: e.to_string(),
            }
        })
    }

    /// Fetches repository metadata.
    ///
    /// Tolerant by design: no status check is performed, and any transport
    /// or decode failure degrades to metadata with an unknown default
    /// branch. An error-shaped body simply lacks the `default_branch`
    /// field and parses to the same result.
    #[must_use]
    pub fn repo_info(&self) -> RepoInfo {
        let url = self.repo_url();
        match self.get(&url).send() {
            Ok(response) => response.json::<RepoInfo>().unwrap_or_else(|e| {
                tracing::warn!(url = %url, error = %e, "Could not decode repository metadata");
                RepoInfo::default()
            }),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Could not fetch repository metadata");
                RepoInfo::default()
            },
        }
    }

    /// Lists the repository's branches.
    ///
    /// Single page only: no pagination parameters are sent, so on upstreams
    /// that paginate only the first page is considered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteRequest`] on a non-success status.
    pub fn list_branches(&self) -> Result<Vec<Branch>> {
        let url = format!("{}/branches", self.repo_url());
        let response = self.send(self.get(&url), &url)?;
        Self::decode(&url, response)
    }

    /// Lists the pull requests associated with a commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteRequest`] on a non-success status.
    pub fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>> {
        let url = format!("{}/commits/{sha}/pulls", self.repo_url());
        let request = self.get(&url).header("accept", Self::PULLS_ACCEPT);
        let response = self.send(request, &url)?;
        Self::decode(&url, response)
    }

    /// Fetches the full detail of a commit by its API URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteRequest`] on a non-success status.
    pub fn commit_detail(&self, url: &str) -> Result<CommitDetail> {
        let response = self.send(self.get(url), url)?;
        Self::decode(url, response)
    }
}

impl BranchHost for GithubClient {
    fn default_branch(&self) -> Option<String> {
        self.repo_info().default_branch
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        self.list_branches()
    }

    fn has_open_pull(&self, sha: &str) -> Result<bool> {
        let pulls = self.pulls_for_commit(sha)?;
        Ok(pulls.iter().any(|p| p.state == PullState::Open))
    }

    fn head_commit_date(&self, head: &BranchHead) -> Result<Option<DateTime<Utc>>> {
        let detail = self.commit_detail(&head.url)?;
        Ok(detail.commit.best_date())
    }
}
