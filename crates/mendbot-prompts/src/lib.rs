//! Prompt assembly for the patch-writing model call.
//!
//! Two pieces per run: a fixed system instruction that pins the model to
//! diff-only output, and a user instruction carrying the issue content.
//! Both are plain string builders so they can be unit tested without a
//! provider in the loop.

use mendbot_core::IssueRef;

/// Fixed system instruction: the model acts as a constrained repository
/// agent and must answer with nothing but a unified diff plus a trailing
/// `COMMIT:` directive.
pub fn system_instruction() -> String {
    let mut prompt = String::new();
    prompt.push_str("You are a repository agent working on a checked-out project.\n");
    prompt.push_str("Change only the files the fix requires.\n");
    prompt.push('\n');
    prompt.push_str("Rules:\n");
    prompt.push_str("- Keep changes small and split into logical steps.\n");
    prompt.push_str("- If build or test commands would break, fix them as part of the patch.\n");
    prompt.push_str("- Reply with *only* a unified diff patch, compatible with `git apply`.\n");
    prompt.push_str("- No prose before or after the diff.\n");
    prompt.push_str("- After the diff, propose a commit message on its own final line,\n");
    prompt.push_str("  formatted as `COMMIT: <short message>`.\n");
    prompt
}

/// Per-issue user instruction embedding the tracker content.
pub fn user_instruction(issue: &IssueRef) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!("Issue title: {}\n", issue.title));
    prompt.push('\n');
    prompt.push_str("Issue body:\n");
    prompt.push_str(&issue.body);
    if !issue.body.ends_with('\n') {
        prompt.push('\n');
    }
    if !issue.labels.is_empty() {
        prompt.push_str(&format!("\nLabels: {}\n", issue.labels.join(", ")));
    }
    prompt.push_str("\nYou are at the repository root. ");
    prompt.push_str("Produce a patch with the minimal changes that resolve the issue:\n");
    prompt.push_str("- Include file additions and deletions in the diff when needed.\n");
    prompt.push_str("- Update README or CHANGELOG entries when the change warrants it.\n");
    prompt.push_str("- End with a short commit message on a separate line: `COMMIT: ...`.\n");
    prompt
}
