//! Recording test doubles for the version-control and tracker seams.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mendbot_core::{AgentError, IssueRef};

use crate::{IssueTrackerClient, PullRequest, PullRequestDraft, PushMode, VersionControlClient};

/// In-memory [`VersionControlClient`] that records every call in order
/// and fails exactly where a test asks it to.
#[derive(Default)]
pub struct MockVersionControl {
    calls: Mutex<Vec<String>>,
    fail_checkout: bool,
    fail_commit: bool,
    fail_push_tracking: bool,
    fail_push_lease: bool,
    fail_push_force: bool,
    fail_fetch: bool,
    fail_rebase: bool,
}

impl MockVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkout_fail(mut self) -> Self {
        self.fail_checkout = true;
        self
    }

    pub fn with_commit_fail(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn with_push_tracking_fail(mut self) -> Self {
        self.fail_push_tracking = true;
        self
    }

    pub fn with_push_lease_fail(mut self) -> Self {
        self.fail_push_lease = true;
        self
    }

    pub fn with_push_force_fail(mut self) -> Self {
        self.fail_push_force = true;
        self
    }

    pub fn with_fetch_fail(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn with_rebase_fail(mut self) -> Self {
        self.fail_rebase = true;
        self
    }

    /// Everything the workflow asked of this client, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VersionControlClient for MockVersionControl {
    async fn checkout_branch(&self, branch: &str) -> Result<(), AgentError> {
        self.record(format!("checkout {branch}"));
        if self.fail_checkout {
            return Err(AgentError::ExternalTool("mock checkout refused".to_string()));
        }
        Ok(())
    }

    async fn commit_all(&self, message: &str) -> Result<(), AgentError> {
        self.record(format!("commit {message}"));
        if self.fail_commit {
            return Err(AgentError::ExternalTool("mock commit refused".to_string()));
        }
        Ok(())
    }

    async fn push(&self, branch: &str, mode: PushMode) -> Result<(), AgentError> {
        self.record(format!("push {mode} {branch}"));
        let fail = match mode {
            PushMode::Tracking => self.fail_push_tracking,
            PushMode::ForceWithLease => self.fail_push_lease,
            PushMode::Force => self.fail_push_force,
        };
        if fail {
            return Err(AgentError::ExternalTool(format!("mock push {mode} refused")));
        }
        Ok(())
    }

    async fn fetch_remote(&self, branch: &str) -> Result<(), AgentError> {
        self.record(format!("fetch {branch}"));
        if self.fail_fetch {
            return Err(AgentError::ExternalTool("mock fetch refused".to_string()));
        }
        Ok(())
    }

    async fn rebase(&self, branch: &str) -> Result<(), AgentError> {
        self.record(format!("rebase {branch}"));
        if self.fail_rebase {
            return Err(AgentError::ExternalTool("mock rebase refused".to_string()));
        }
        Ok(())
    }
}

/// In-memory [`IssueTrackerClient`] with a canned issue, a configurable
/// default branch, and a counter for created pull requests.
pub struct MockIssueTracker {
    issue: IssueRef,
    default_branch: String,
    fail_issue: bool,
    fail_default_branch: bool,
    fail_pr: bool,
    next_pr_number: AtomicU64,
    created: Mutex<Vec<PullRequestDraft>>,
}

impl MockIssueTracker {
    pub fn new(issue: IssueRef) -> Self {
        Self {
            issue,
            default_branch: "main".to_string(),
            fail_issue: false,
            fail_default_branch: false,
            fail_pr: false,
            next_pr_number: AtomicU64::new(100),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_default_branch(mut self, name: &str) -> Self {
        self.default_branch = name.to_string();
        self
    }

    pub fn with_default_branch_fail(mut self) -> Self {
        self.fail_default_branch = true;
        self
    }

    pub fn with_issue_fail(mut self) -> Self {
        self.fail_issue = true;
        self
    }

    pub fn with_pr_fail(mut self) -> Self {
        self.fail_pr = true;
        self
    }

    /// Drafts this tracker has opened pull requests from, in order.
    pub fn created(&self) -> Vec<PullRequestDraft> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerClient for MockIssueTracker {
    async fn fetch_issue(&self, number: u64) -> Result<IssueRef, AgentError> {
        if self.fail_issue {
            return Err(AgentError::ExternalTool(format!(
                "mock: no issue #{number}"
            )));
        }
        Ok(IssueRef {
            number,
            ..self.issue.clone()
        })
    }

    async fn default_branch(&self) -> Result<String, AgentError> {
        if self.fail_default_branch {
            return Err(AgentError::ExternalTool(
                "mock: default branch unavailable".to_string(),
            ));
        }
        Ok(self.default_branch.clone())
    }

    async fn create_pull_request(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequest, AgentError> {
        if self.fail_pr {
            return Err(AgentError::ExternalTool(
                "mock: pull request creation refused".to_string(),
            ));
        }
        self.created.lock().unwrap().push(draft.clone());
        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            url: format!("https://github.com/mock/repo/pull/{number}"),
            branch: draft.head.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> IssueRef {
        IssueRef {
            number: 3,
            title: "Sample".to_string(),
            body: String::new(),
            labels: Vec::new(),
        }
    }

    #[tokio::test]
    async fn version_control_records_calls_in_order() {
        let vcs = MockVersionControl::new();
        vcs.checkout_branch("agent/issue-3-sample-r1").await.unwrap();
        vcs.commit_all("agent: sample").await.unwrap();
        vcs.push("agent/issue-3-sample-r1", PushMode::Tracking)
            .await
            .unwrap();

        assert_eq!(
            vcs.calls(),
            vec![
                "checkout agent/issue-3-sample-r1",
                "commit agent: sample",
                "push tracking agent/issue-3-sample-r1",
            ]
        );
    }

    #[tokio::test]
    async fn push_failure_is_per_mode() {
        let vcs = MockVersionControl::new().with_push_tracking_fail();
        assert!(vcs.push("b", PushMode::Tracking).await.is_err());
        assert!(vcs.push("b", PushMode::ForceWithLease).await.is_ok());
        assert!(vcs.push("b", PushMode::Force).await.is_ok());
    }

    #[tokio::test]
    async fn tracker_counts_created_pull_requests() {
        let tracker = MockIssueTracker::new(issue());
        let draft = PullRequestDraft {
            title: "[agent] Sample".to_string(),
            body: "body".to_string(),
            base: "main".to_string(),
            head: "agent/issue-3-sample-r1".to_string(),
        };

        let first = tracker.create_pull_request(&draft).await.unwrap();
        let second = tracker.create_pull_request(&draft).await.unwrap();

        assert_eq!(first.number, 100);
        assert_eq!(second.number, 101);
        assert_eq!(tracker.created().len(), 2);
        assert_eq!(first.branch, "agent/issue-3-sample-r1");
    }

    #[tokio::test]
    async fn tracker_issue_fetch_fills_in_number() {
        let tracker = MockIssueTracker::new(issue());
        let fetched = tracker.fetch_issue(99).await.unwrap();
        assert_eq!(fetched.number, 99);
        assert_eq!(fetched.title, "Sample");
    }
}
