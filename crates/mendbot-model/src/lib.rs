pub mod client;
pub mod mock;
pub mod parse;

use async_trait::async_trait;
use mendbot_core::{AgentError, GeneratedPatch, IssueRef};

pub use client::ModelClient;
pub use mock::MockGenerator;

/// The model boundary: one call per run, issue in, candidate patch out.
///
/// Implementations own prompt assembly and output parsing; callers only
/// see the already-split `GeneratedPatch`.
#[async_trait]
pub trait PatchGenerator: Send + Sync {
    /// Short name for logging, e.g. "anthropic" or "mock".
    fn name(&self) -> &str;

    /// Ask the model for a patch resolving the given issue.
    async fn generate(&self, issue: &IssueRef) -> Result<GeneratedPatch, AgentError>;
}
