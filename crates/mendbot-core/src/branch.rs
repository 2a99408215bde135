//! Branch naming for agent-owned work branches.
//!
//! Every run works on its own branch derived from the issue number, a
//! slug of the issue title, and the CI run attempt. Re-running the same
//! attempt reproduces the same name; a new attempt gets a fresh one, so
//! retried workflows never collide with a half-pushed predecessor.

const MAX_SLUG_LEN: usize = 40;
const FALLBACK_SLUG: &str = "issue";

/// Reduce an issue title to a ref-safe slug: lowercased, anything that
/// is not a letter, digit, or hyphen dropped, whitespace runs collapsed
/// to single hyphens, bounded length.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = kept.split_whitespace().collect::<Vec<_>>().join("-");

    // Collapse hyphen runs (from the title itself or from adjacent
    // dropped characters) and trim the edges.
    let collapsed = hyphenated
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    // Truncation can land on a hyphen boundary; trim again.
    let truncated: String = collapsed.chars().take(MAX_SLUG_LEN).collect();
    let slug = truncated.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Work branch for one issue and one CI run attempt.
pub fn branch_name(issue_number: u64, title: &str, run_attempt: &str) -> String {
    format!(
        "agent/issue-{issue_number}-{}-r{run_attempt}",
        slugify(title)
    )
}
