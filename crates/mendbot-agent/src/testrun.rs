//! The optional test step.
//!
//! Tests are advisory for this workflow: a missing runner or a failing
//! suite ends up in the pull-request body, not in a failed run. Humans
//! review the patch either way.

use std::path::Path;

use mendbot_core::{AgentError, TestOutcome, TestReport};
use tokio::process::Command;
use tracing::info;

/// At most this many characters of combined output make it into the
/// pull-request body.
const EXCERPT_MAX: usize = 2000;

/// Run the configured test command if its program exists on PATH.
///
/// The probe checks only the first token of the command; shells resolve
/// the rest at run time.
pub async fn run(command: &str, work_dir: &Path) -> Result<TestReport, AgentError> {
    let program = command.split_whitespace().next().unwrap_or_default();
    if program.is_empty() {
        return Ok(TestReport::skipped());
    }

    let probe = Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {program}"))
        .output()
        .await
        .map_err(|e| AgentError::ExternalTool(format!("failed to probe for {program}: {e}")))?;

    if !probe.status.success() {
        info!("{program} not installed; skipping tests");
        return Ok(TestReport::skipped());
    }

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(work_dir)
        .output()
        .await
        .map_err(|e| AgentError::ExternalTool(format!("failed to run {command}: {e}")))?;

    let outcome = if output.status.success() {
        TestOutcome::Passed
    } else {
        TestOutcome::Failed
    };
    info!("test command `{command}` finished: {outcome}");

    Ok(TestReport {
        outcome,
        excerpt: excerpt(&output.stdout, &output.stderr),
    })
}

fn excerpt(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    let combined = format!("{}\n{}", stdout.trim_end(), stderr.trim_end());
    combined.trim().chars().take(EXCERPT_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn passing_command_reports_passed() {
        let dir = tempdir().unwrap();
        let report = run("true", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::Passed);
    }

    #[tokio::test]
    async fn failing_command_reports_failed() {
        let dir = tempdir().unwrap();
        let report = run("false", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::Failed);
    }

    #[tokio::test]
    async fn missing_program_is_skipped() {
        let dir = tempdir().unwrap();
        let report = run("surely-not-a-real-test-runner-4711", dir.path())
            .await
            .unwrap();
        assert_eq!(report.outcome, TestOutcome::SkippedNoRunner);
        assert!(report.excerpt.is_empty());
    }

    #[tokio::test]
    async fn empty_command_is_skipped() {
        let dir = tempdir().unwrap();
        let report = run("   ", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::SkippedNoRunner);
    }

    #[tokio::test]
    async fn output_lands_in_the_excerpt() {
        let dir = tempdir().unwrap();
        let report = run("echo 3 passed, 0 failed", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::Passed);
        assert_eq!(report.excerpt, "3 passed, 0 failed");
    }

    #[tokio::test]
    async fn excerpt_is_bounded() {
        let dir = tempdir().unwrap();
        let report = run("yes x | head -c 5000", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::Passed);
        assert!(report.excerpt.chars().count() <= EXCERPT_MAX);
    }

    #[tokio::test]
    async fn command_runs_in_the_work_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here\n").unwrap();
        let report = run("cat marker.txt", dir.path()).await.unwrap();
        assert_eq!(report.outcome, TestOutcome::Passed);
        assert_eq!(report.excerpt, "here");
    }
}
