/// The model's answer for one run, already split into its two parts.
///
/// The diff text is assumed, not verified, to be `git apply` compatible;
/// the apply step is the arbiter of whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPatch {
    /// Unified diff text, without any surrounding code fence.
    pub diff: String,
    /// Message from a trailing `COMMIT: <message>` directive, when the
    /// model supplied one. Absent means the caller falls back to the
    /// issue title.
    pub commit_message: Option<String>,
}

impl GeneratedPatch {
    pub fn new(diff: &str) -> Self {
        Self {
            diff: diff.to_string(),
            commit_message: None,
        }
    }
}
