//! Boundary over the `git` and `gh` command-line tools.
//!
//! The workflow talks to source control through two narrow traits so the
//! orchestration logic can be tested with recording doubles while the
//! real implementations shell out.

pub mod gh;
pub mod git;
pub mod mock;
pub mod patch;

use std::fmt;

use async_trait::async_trait;
use mendbot_core::{AgentError, IssueRef};

pub use gh::GhCli;
pub use git::GitCli;
pub use mock::{MockIssueTracker, MockVersionControl};

/// How a push should be performed. The workflow escalates through these
/// tiers in order when the remote refuses the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    /// Plain `git push -u origin <branch>`.
    Tracking,
    /// Adds `--force-with-lease`: overwrite only history we have seen.
    ForceWithLease,
    /// Adds `--force`: unconditional overwrite.
    Force,
}

impl PushMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushMode::Tracking => "tracking",
            PushMode::ForceWithLease => "force-with-lease",
            PushMode::Force => "force",
        }
    }
}

impl fmt::Display for PushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pull request to be opened. Composed only after the branch is on
/// the remote; submitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub base: String,
    pub head: String,
}

/// A pull request the tracker created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
    pub branch: String,
}

/// Seam over the local source-control CLI. Implementations own the
/// working tree they operate on; one run works one tree.
#[async_trait]
pub trait VersionControlClient: Send + Sync {
    /// Create or reset the work branch and switch to it.
    async fn checkout_branch(&self, branch: &str) -> Result<(), AgentError>;

    /// Stage everything and commit as the bot identity. A clean tree is
    /// not an error.
    async fn commit_all(&self, message: &str) -> Result<(), AgentError>;

    /// Push the branch with the given mode.
    async fn push(&self, branch: &str, mode: PushMode) -> Result<(), AgentError>;

    /// Fetch the remote copy of the branch, if one exists.
    async fn fetch_remote(&self, branch: &str) -> Result<(), AgentError>;

    /// Rebase the local branch onto its remote counterpart.
    async fn rebase(&self, branch: &str) -> Result<(), AgentError>;
}

/// Seam over the issue/PR hosting CLI.
#[async_trait]
pub trait IssueTrackerClient: Send + Sync {
    /// Fetch title, body, and labels for an issue.
    async fn fetch_issue(&self, number: u64) -> Result<IssueRef, AgentError>;

    /// Name of the repository's default branch.
    async fn default_branch(&self) -> Result<String, AgentError>;

    /// Open a pull request from the draft.
    async fn create_pull_request(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequest, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_mode_display() {
        assert_eq!(PushMode::Tracking.to_string(), "tracking");
        assert_eq!(PushMode::ForceWithLease.to_string(), "force-with-lease");
        assert_eq!(PushMode::Force.to_string(), "force");
    }
}
