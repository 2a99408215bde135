//! The issue-to-pull-request workflow.
//!
//! Fixed sequence: fetch issue, create branch, generate patch, apply,
//! run tests, commit, push, open pull request. Steps report into a
//! [`RunReport`] with one of three outcomes; which failures end the run
//! is decided by [`failure_policy`] in one place.

use std::path::Path;

use anyhow::Result;
use mendbot_core::branch;
use mendbot_core::{AgentError, GeneratedPatch, IssueRef, Step, StepOutcome, TestReport};
use mendbot_model::PatchGenerator;
use mendbot_vcs::{
    patch, IssueTrackerClient, PullRequest, PullRequestDraft, PushMode, VersionControlClient,
};
use tracing::{error, info, warn};

use crate::testrun;

/// Base branch to target when the remote's default branch cannot be
/// determined.
const FALLBACK_BASE_BRANCH: &str = "main";
/// Prefix on every commit message the agent writes.
const COMMIT_PREFIX: &str = "agent: ";
/// Prefix on every pull-request title the agent opens.
const PR_TITLE_PREFIX: &str = "[agent] ";

/// What the orchestrator does when a step reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Abort,
    Continue,
}

/// The continue-vs-abort table. Only the test step is advisory; every
/// other step is fail-fast. The push step runs its fallback tiers
/// internally and reports a failure only once all of them are spent.
pub fn failure_policy(step: Step) -> FailurePolicy {
    match step {
        Step::RunTests => FailurePolicy::Continue,
        _ => FailurePolicy::Abort,
    }
}

/// Accumulated record of one run: per-step outcomes plus the artifacts
/// worth keeping around.
#[derive(Debug, Default)]
pub struct RunReport {
    pub steps: Vec<(Step, StepOutcome)>,
    pub branch: Option<String>,
    pub tests: Option<TestReport>,
    pub pull_request: Option<PullRequest>,
}

impl RunReport {
    fn ok(&mut self, step: Step) {
        info!("{step}: ok");
        self.steps.push((step, StepOutcome::Ok));
    }

    fn degraded(&mut self, step: Step, note: &str) {
        warn!("{step}: {note}");
        self.steps
            .push((step, StepOutcome::Recoverable(note.to_string())));
    }
}

/// Record a fatal step outcome and turn it into the run's error.
fn fatal(report: &mut RunReport, step: Step, err: AgentError) -> anyhow::Error {
    error!("{step}: {err}");
    report.steps.push((step, StepOutcome::Fatal(err.clone())));
    anyhow::Error::new(err).context(format!("{step} failed"))
}

/// Run the whole workflow for one issue.
///
/// The working tree under `work_dir` is assumed to be a fresh checkout
/// this run exclusively owns.
pub async fn execute(
    tracker: &dyn IssueTrackerClient,
    vcs: &dyn VersionControlClient,
    generator: &dyn PatchGenerator,
    work_dir: &Path,
    issue_number: u64,
    run_attempt: &str,
    test_command: &str,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    // 1. Fetch the issue.
    let issue = match tracker.fetch_issue(issue_number).await {
        Ok(issue) => {
            report.ok(Step::FetchIssue);
            issue
        }
        Err(e) => return Err(fatal(&mut report, Step::FetchIssue, e)),
    };
    info!("working on issue #{}: {}", issue.number, issue.title);

    // 2. Create the attempt-scoped work branch.
    let work_branch = branch::branch_name(issue_number, &issue.title, run_attempt);
    match vcs.checkout_branch(&work_branch).await {
        Ok(()) => report.ok(Step::CreateBranch),
        Err(e) => return Err(fatal(&mut report, Step::CreateBranch, e)),
    }
    report.branch = Some(work_branch.clone());

    // 3. Ask the model for a patch.
    info!("requesting patch from {}", generator.name());
    let generated = match generator.generate(&issue).await {
        Ok(generated) => {
            report.ok(Step::GeneratePatch);
            generated
        }
        Err(e) => return Err(fatal(&mut report, Step::GeneratePatch, e)),
    };

    // 4. Apply it to the working tree.
    match patch::apply_patch(work_dir, &generated.diff).await {
        Ok(()) => report.ok(Step::ApplyPatch),
        Err(e) => return Err(fatal(&mut report, Step::ApplyPatch, e)),
    }

    // 5. Run tests. Advisory: failures are reported, not fatal.
    let tests = match testrun::run(test_command, work_dir).await {
        Ok(tests) => {
            report.ok(Step::RunTests);
            tests
        }
        Err(e) if failure_policy(Step::RunTests) == FailurePolicy::Continue => {
            report.degraded(Step::RunTests, &format!("test step error: {e}"));
            TestReport::skipped()
        }
        Err(e) => return Err(fatal(&mut report, Step::RunTests, e)),
    };
    report.tests = Some(tests.clone());

    // 6. Commit as the bot.
    let message = commit_message(&issue, &generated);
    match vcs.commit_all(&message).await {
        Ok(()) => report.ok(Step::Commit),
        Err(e) => return Err(fatal(&mut report, Step::Commit, e)),
    }

    // 7. Push, escalating through the fallback tiers if needed.
    push_with_fallback(vcs, &work_branch, &mut report).await?;

    // 8. Open the pull request against the default branch.
    let base = match tracker.default_branch().await {
        Ok(base) => base,
        Err(e) => {
            warn!("default branch lookup failed: {e}; assuming {FALLBACK_BASE_BRANCH}");
            FALLBACK_BASE_BRANCH.to_string()
        }
    };
    let draft = PullRequestDraft {
        title: pr_title(&issue),
        body: pr_body(&issue, &tests),
        base,
        head: work_branch,
    };
    let pr = match tracker.create_pull_request(&draft).await {
        Ok(pr) => {
            report.ok(Step::OpenPullRequest);
            pr
        }
        Err(e) => return Err(fatal(&mut report, Step::OpenPullRequest, e)),
    };
    info!("opened pull request #{}: {}", pr.number, pr.url);
    report.pull_request = Some(pr);

    Ok(report)
}

/// Push with three escalation tiers: plain tracking push, then fetch +
/// rebase + `--force-with-lease`, then unconditional `--force`.
///
/// Earlier tiers failing is expected when a previous CI attempt already
/// pushed this branch. The branch is agent-owned and disposable, so
/// overwriting its remote history is acceptable; only exhausting all
/// three tiers ends the run.
async fn push_with_fallback(
    vcs: &dyn VersionControlClient,
    work_branch: &str,
    report: &mut RunReport,
) -> Result<()> {
    match vcs.push(work_branch, PushMode::Tracking).await {
        Ok(()) => {
            report.ok(Step::Push);
            return Ok(());
        }
        Err(e) => warn!("plain push failed: {e}; retrying with fetch + rebase + lease"),
    }

    // Best effort: the remote branch may be gone, the rebase may no-op.
    if let Err(e) = vcs.fetch_remote(work_branch).await {
        info!("fetch before rebase failed (ignored): {e}");
    }
    if let Err(e) = vcs.rebase(work_branch).await {
        info!("rebase onto remote failed (ignored): {e}");
    }

    match vcs.push(work_branch, PushMode::ForceWithLease).await {
        Ok(()) => {
            report.degraded(Step::Push, "pushed with --force-with-lease after rebase");
            return Ok(());
        }
        Err(e) => warn!("lease push failed: {e}; forcing"),
    }

    match vcs.push(work_branch, PushMode::Force).await {
        Ok(()) => {
            report.degraded(Step::Push, "force-pushed after lease push failed");
            Ok(())
        }
        Err(e) => Err(fatal(report, Step::Push, e)),
    }
}

/// Commit message: the model's directive when present, else the issue
/// title, always under the agent prefix.
fn commit_message(issue: &IssueRef, generated: &GeneratedPatch) -> String {
    let subject = generated.commit_message.as_deref().unwrap_or(&issue.title);
    format!("{COMMIT_PREFIX}{subject}")
}

fn pr_title(issue: &IssueRef) -> String {
    format!("{PR_TITLE_PREFIX}{}", issue.title)
}

/// Pull-request body: test outcome up top, then the provenance line and
/// the auto-close reference back to the issue.
fn pr_body(issue: &IssueRef, tests: &TestReport) -> String {
    let mut body = String::new();
    body.push_str("## Tests\n\n");
    body.push_str(tests.outcome.summary());
    body.push('\n');
    if !tests.excerpt.is_empty() {
        body.push_str(&format!("\n```\n{}\n```\n", tests.excerpt));
    }
    body.push_str(&format!(
        "\nThis PR was generated automatically from issue #{}.\n\nCloses #{}\n",
        issue.number, issue.number
    ));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use mendbot_core::TestOutcome;

    fn sample_issue() -> IssueRef {
        IssueRef {
            number: 17,
            title: "Fix: null pointer (#42)!!".to_string(),
            body: "Crash in the request handler.".to_string(),
            labels: vec!["bug".to_string()],
        }
    }

    #[test]
    fn policy_table_only_tolerates_test_failures() {
        for step in [
            Step::FetchIssue,
            Step::CreateBranch,
            Step::GeneratePatch,
            Step::ApplyPatch,
            Step::Commit,
            Step::Push,
            Step::OpenPullRequest,
        ] {
            assert_eq!(failure_policy(step), FailurePolicy::Abort, "{step}");
        }
        assert_eq!(failure_policy(Step::RunTests), FailurePolicy::Continue);
    }

    #[test]
    fn commit_message_prefers_the_directive() {
        let generated = GeneratedPatch {
            diff: String::new(),
            commit_message: Some("tighten input validation".to_string()),
        };
        assert_eq!(
            commit_message(&sample_issue(), &generated),
            "agent: tighten input validation"
        );
    }

    #[test]
    fn commit_message_falls_back_to_the_title() {
        let generated = GeneratedPatch::new("");
        assert_eq!(
            commit_message(&sample_issue(), &generated),
            "agent: Fix: null pointer (#42)!!"
        );
    }

    #[test]
    fn pr_title_carries_the_agent_tag() {
        assert_eq!(
            pr_title(&sample_issue()),
            "[agent] Fix: null pointer (#42)!!"
        );
    }

    #[test]
    fn pr_body_reports_tests_and_closes_the_issue() {
        let tests = TestReport {
            outcome: TestOutcome::Failed,
            excerpt: "1 failed, 3 passed".to_string(),
        };
        let body = pr_body(&sample_issue(), &tests);
        assert!(body.contains("Tests failed"));
        assert!(body.contains("1 failed, 3 passed"));
        assert!(body.contains("generated automatically from issue #17"));
        assert!(body.contains("Closes #17"));
    }

    #[test]
    fn pr_body_omits_empty_excerpt() {
        let body = pr_body(&sample_issue(), &TestReport::skipped());
        assert!(!body.contains("```"));
        assert!(body.contains("No test runner available"));
    }
}
