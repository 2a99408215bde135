use thiserror::Error;

/// Failure taxonomy for an agent run.
///
/// Every failure the workflow can hit lands in one of three buckets: an
/// invoked CLI tool misbehaving (spawn failure, nonzero exit, garbage
/// output), `git apply` rejecting the generated diff, or the model
/// provider call going wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("external tool error: {0}")]
    ExternalTool(String),

    #[error("patch apply error: {0}")]
    PatchApply(String),

    #[error("model call error: {0}")]
    ModelCall(String),
}
