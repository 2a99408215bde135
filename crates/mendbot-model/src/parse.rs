//! Parsing of raw model text into a [`GeneratedPatch`].
//!
//! The model is told to reply with a bare unified diff plus a trailing
//! `COMMIT: <message>` line. Models wrap output in a code fence anyway
//! often enough that one is stripped when present. The diff itself is
//! passed through unvalidated; `git apply` is the arbiter.

use mendbot_core::GeneratedPatch;

/// Split raw model output into diff text and an optional commit message.
pub fn parse_patch_output(raw: &str) -> GeneratedPatch {
    let (diff_part, commit_message) = split_commit_directive(raw);
    let diff = strip_code_fence(&diff_part).trim().to_string();
    GeneratedPatch {
        diff,
        commit_message,
    }
}

/// Split an optional `COMMIT: <message>` directive off the output.
///
/// The directive must start its own line. Everything before the first
/// such line is the diff; anything after it is discarded. A directive
/// with an empty message yields no commit message.
fn split_commit_directive(raw: &str) -> (String, Option<String>) {
    let mut diff_lines: Vec<&str> = Vec::new();
    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("COMMIT:") {
            let message = rest.trim();
            let message = if message.is_empty() {
                None
            } else {
                Some(message.to_string())
            };
            return (diff_lines.join("\n"), message);
        }
        diff_lines.push(line);
    }
    (diff_lines.join("\n"), None)
}

/// Drop one surrounding Markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    // Drop the opening fence line, which may carry a language tag.
    let rest = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    let rest = rest.trim_end();
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    }
}
