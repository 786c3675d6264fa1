//! Stale-branch evaluation.
//!
//! The decision procedure over the branch metadata a [`BranchHost`]
//! exposes: a branch is deletable when it is unprotected, not the default
//! branch, not on the ignore list, not referenced by an open pull request,
//! and its head commit is strictly older than the age threshold.

use crate::Result;
use crate::github::{Branch, BranchHost};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Source of the current time.
///
/// Injected so tests can evaluate against a fixed instant instead of the
/// wall clock.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Determines which branches of a repository are safe to delete.
///
/// Each evaluation run is stateless and independent: two runs against
/// unchanged upstream state yield identical output.
pub struct StaleEvaluator<H, C = SystemClock> {
    host: H,
    clock: C,
}

impl<H: BranchHost> StaleEvaluator<H, SystemClock> {
    /// Creates an evaluator using the wall clock.
    pub const fn new(host: H) -> Self {
        Self {
            host,
            clock: SystemClock,
        }
    }
}

impl<H: BranchHost, C: Clock> StaleEvaluator<H, C> {
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> StaleEvaluator<H, C2> {
        StaleEvaluator {
            host: self.host,
            clock,
        }
    }

    /// Returns the names of all branches eligible for deletion, in the
    /// order the host lists them.
    ///
    /// A branch qualifies only when every filter passes: it is not
    /// protected, not the default branch, not in `ignore`, its head commit
    /// is not referenced by an open pull request, and the head commit is
    /// strictly older than `age_threshold_days`. The filters short-circuit
    /// in that order, so the network lookups only run for branches that
    /// survive the cheap checks.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of the branch listing, a pull-request
    /// lookup, or a commit lookup; no partial result is returned.
    pub fn deletable_branches(
        &self,
        age_threshold_days: u32,
        ignore: &HashSet<String>,
    ) -> Result<Vec<String>> {
        // The default branch might not be protected.
        let default_branch = self.host.default_branch();

        let mut deletable = Vec::new();
        for branch in self.host.branches()? {
            if branch.protected {
                tracing::debug!(branch = %branch.name, "Skipping protected branch");
                continue;
            }
            if default_branch.as_deref() == Some(branch.name.as_str()) {
                tracing::debug!(branch = %branch.name, "Skipping default branch");
                continue;
            }
            if ignore.contains(&branch.name) {
                tracing::debug!(branch = %branch.name, "Skipping ignored branch");
                continue;
            }
            if self.host.has_open_pull(&branch.commit.sha)? {
                tracing::debug!(branch = %branch.name, "Skipping branch with open pull request");
                continue;
            }
            if !self.is_stale(&branch, age_threshold_days)? {
                tracing::debug!(branch = %branch.name, "Skipping branch with recent commits");
                continue;
            }
            deletable.push(branch.name);
        }

        tracing::info!(branches = ?deletable, "Deletable branches");

        Ok(deletable)
    }

    /// Returns whether the branch's head commit is strictly older than the
    /// threshold.
    ///
    /// A commit with no usable date counts as not stale: when in doubt,
    /// keep the branch.
    fn is_stale(&self, branch: &Branch, age_threshold_days: u32) -> Result<bool> {
        let Some(commit_date) = self.host.head_commit_date(&branch.commit)? else {
            tracing::warn!(
                branch = %branch.name,
                url = %branch.commit.url,
                "Could not determine commit date; assuming the branch is not old enough to delete"
            );
            return Ok(false);
        };

        Ok(self.clock.now() > commit_date + Duration::days(i64::from(age_threshold_days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::github::BranchHead;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// Fixed instant all tests evaluate against.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// In-memory branch host.
    #[derive(Default)]
    struct MockHost {
        default_branch: Option<String>,
        branches: Vec<Branch>,
        /// Shas referenced by an open pull request.
        open_pulls: HashSet<String>,
        /// Head commit dates by sha; absent entry means no usable date.
        dates: HashMap<String, DateTime<Utc>>,
        /// When set, the branch listing fails with this HTTP status.
        listing_failure: Option<u16>,
    }

    impl MockHost {
        fn with_branch(mut self, name: &str, protected: bool, age_days: i64) -> Self {
            let sha = format!("sha-{name}");
            self.dates.insert(sha.clone(), now() - Duration::days(age_days));
            self.branches.push(branch(name, protected, &sha));
            self
        }

        fn with_undated_branch(mut self, name: &str) -> Self {
            self.branches.push(branch(name, false, &format!("sha-{name}")));
            self
        }

        fn with_open_pull_on(mut self, name: &str) -> Self {
            self.open_pulls.insert(format!("sha-{name}"));
            self
        }

        fn with_default_branch(mut self, name: &str) -> Self {
            self.default_branch = Some(name.to_string());
            self
        }
    }

    fn branch(name: &str, protected: bool, sha: &str) -> Branch {
        Branch {
            name: name.to_string(),
            protected,
            commit: BranchHead {
                sha: sha.to_string(),
                url: format!("https://api.example.com/commits/{sha}"),
            },
        }
    }

    impl BranchHost for MockHost {
        fn default_branch(&self) -> Option<String> {
            self.default_branch.clone()
        }

        fn branches(&self) -> Result<Vec<Branch>> {
            if let Some(status) = self.listing_failure {
                return Err(Error::RemoteRequest {
                    url: "https://api.example.com/repos/acme/widgets/branches".to_string(),
                    status,
                    body: r#"{"message": "Forbidden"}"#.to_string(),
                });
            }
            Ok(self.branches.clone())
        }

        fn has_open_pull(&self, sha: &str) -> Result<bool> {
            Ok(self.open_pulls.contains(sha))
        }

        fn head_commit_date(&self, head: &BranchHead) -> Result<Option<DateTime<Utc>>> {
            Ok(self.dates.get(&head.sha).copied())
        }
    }

    fn evaluate(host: MockHost, age_days: u32, ignore: &[&str]) -> Result<Vec<String>> {
        let ignore: HashSet<String> = ignore.iter().map(ToString::to_string).collect();
        StaleEvaluator::new(host)
            .with_clock(FixedClock(now()))
            .deletable_branches(age_days, &ignore)
    }

    #[test]
    fn test_old_unprotected_branch_is_deletable() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("main", false, 1)
            .with_branch("feature-x", false, 100);

        let result = evaluate(host, 30, &[]).unwrap();
        assert_eq!(result, vec!["feature-x"]);
    }

    #[test]
    fn test_open_pull_keeps_branch() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("main", false, 1)
            .with_branch("feature-x", false, 100)
            .with_open_pull_on("feature-x");

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_recent_branch_is_kept() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("main", false, 1)
            .with_branch("feature-x", false, 10);

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_ignored_branch_is_kept() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("release", false, 365)
            .with_branch("feature-x", false, 365);

        let result = evaluate(host, 30, &["release"]).unwrap();
        assert_eq!(result, vec!["feature-x"]);
    }

    #[test]
    fn test_missing_commit_date_keeps_branch() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_undated_branch("feature-x");

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_listing_failure_aborts_with_status() {
        let host = MockHost {
            listing_failure: Some(403),
            ..MockHost::default()
        };

        let err = evaluate(host, 30, &[]).unwrap_err();
        match err {
            Error::RemoteRequest { url, status, .. } => {
                assert_eq!(status, 403);
                assert!(url.ends_with("/branches"));
            },
            other => panic!("expected RemoteRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_protected_branch_never_deletable() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("locked", true, 1000);

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_default_branch_never_deletable_even_when_stale() {
        let host = MockHost::default()
            .with_default_branch("develop")
            .with_branch("develop", false, 1000);

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_default_branch_disables_exclusion() {
        // When the repository metadata could not be fetched, no branch is
        // exempted as the default.
        let host = MockHost::default().with_branch("main", false, 1000);

        let result = evaluate(host, 30, &[]).unwrap();
        assert_eq!(result, vec!["main"]);
    }

    #[test]
    fn test_age_boundary_is_exclusive() {
        // A commit exactly threshold days old is not strictly older.
        let mut host = MockHost::default().with_default_branch("main");
        let sha = "sha-boundary".to_string();
        host.dates.insert(sha.clone(), now() - Duration::days(30));
        host.branches.push(branch("boundary", false, &sha));

        let result = evaluate(host, 30, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_one_second_past_boundary_is_deletable() {
        let mut host = MockHost::default().with_default_branch("main");
        let sha = "sha-boundary".to_string();
        host.dates.insert(
            sha.clone(),
            now() - Duration::days(30) - Duration::seconds(1),
        );
        host.branches.push(branch("boundary", false, &sha));

        let result = evaluate(host, 30, &[]).unwrap();
        assert_eq!(result, vec!["boundary"]);
    }

    #[test]
    fn test_zero_threshold_deletes_any_branch_with_a_past_commit() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("feature-x", false, 1);

        let result = evaluate(host, 0, &[]).unwrap();
        assert_eq!(result, vec!["feature-x"]);
    }

    #[test]
    fn test_output_preserves_listing_order() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("zulu", false, 100)
            .with_branch("alpha", false, 100)
            .with_branch("mike", false, 100);

        let result = evaluate(host, 30, &[]).unwrap();
        assert_eq!(result, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_repeated_evaluation_is_idempotent() {
        let host = MockHost::default()
            .with_default_branch("main")
            .with_branch("main", false, 1)
            .with_branch("feature-x", false, 100)
            .with_branch("feature-y", false, 10);

        let ignore = HashSet::new();
        let evaluator = StaleEvaluator::new(host).with_clock(FixedClock(now()));
        let first = evaluator.deletable_branches(30, &ignore).unwrap();
        let second = evaluator.deletable_branches(30, &ignore).unwrap();
        assert_eq!(first, second);
    }
}
