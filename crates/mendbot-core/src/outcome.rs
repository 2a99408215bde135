use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Tri-state result of the optional test step.
///
/// A missing runner and failing tests are both reportable conditions,
/// not run-ending errors; the distinction only matters for what the
/// pull request says about the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed,
    SkippedNoRunner,
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::SkippedNoRunner => "skipped_no_runner",
        }
    }

    pub fn parse_str(s: &str) -> Option<TestOutcome> {
        match s {
            "passed" => Some(TestOutcome::Passed),
            "failed" => Some(TestOutcome::Failed),
            "skipped_no_runner" => Some(TestOutcome::SkippedNoRunner),
            _ => None,
        }
    }

    /// One-line summary for the pull-request body.
    pub fn summary(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "Tests passed.",
            TestOutcome::Failed => "Tests failed; the patch still needs review.",
            TestOutcome::SkippedNoRunner => "No test runner available; tests were skipped.",
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the test step plus a bounded output excerpt for the
/// pull-request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub outcome: TestOutcome,
    pub excerpt: String,
}

impl TestReport {
    pub fn skipped() -> Self {
        Self {
            outcome: TestOutcome::SkippedNoRunner,
            excerpt: String::new(),
        }
    }
}

/// One step of the fixed workflow sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchIssue,
    CreateBranch,
    GeneratePatch,
    ApplyPatch,
    RunTests,
    Commit,
    Push,
    OpenPullRequest,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::FetchIssue => "fetch_issue",
            Step::CreateBranch => "create_branch",
            Step::GeneratePatch => "generate_patch",
            Step::ApplyPatch => "apply_patch",
            Step::RunTests => "run_tests",
            Step::Commit => "commit",
            Step::Push => "push",
            Step::OpenPullRequest => "open_pull_request",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a step ended, in a single tagged shape so the orchestrator's
/// continue-vs-abort decision reads off one type instead of scattered
/// error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ok,
    /// The step degraded but the run goes on: a push that needed a
    /// fallback tier, a test step that errored.
    Recoverable(String),
    /// The run ends here.
    Fatal(AgentError),
}

impl StepOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, StepOutcome::Fatal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [
            TestOutcome::Passed,
            TestOutcome::Failed,
            TestOutcome::SkippedNoRunner,
        ] {
            assert_eq!(TestOutcome::parse_str(outcome.as_str()), Some(outcome));
        }
    }

    #[test]
    fn test_outcome_parse_rejects_unknown() {
        assert_eq!(TestOutcome::parse_str("exploded"), None);
    }

    #[test]
    fn test_outcome_serde_uses_snake_case() {
        let json = serde_json::to_string(&TestOutcome::SkippedNoRunner).unwrap();
        assert_eq!(json, r#""skipped_no_runner""#);
    }

    #[test]
    fn step_display() {
        assert_eq!(Step::FetchIssue.to_string(), "fetch_issue");
        assert_eq!(Step::OpenPullRequest.to_string(), "open_pull_request");
    }

    #[test]
    fn step_outcome_fatal_detection() {
        assert!(!StepOutcome::Ok.is_fatal());
        assert!(!StepOutcome::Recoverable("forced push".to_string()).is_fatal());
        assert!(StepOutcome::Fatal(AgentError::PatchApply("rejected".to_string())).is_fatal());
    }
}
