//! Mock patch generator for tests.

use async_trait::async_trait;
use mendbot_core::{AgentError, GeneratedPatch, IssueRef};

use crate::PatchGenerator;

/// A preconfigured generator that returns a fixed result without any
/// network traffic.
pub struct MockGenerator {
    result: Result<GeneratedPatch, AgentError>,
}

impl MockGenerator {
    /// A generator that succeeds with the given diff text.
    pub fn success(diff: &str) -> Self {
        Self {
            result: Ok(GeneratedPatch::new(diff)),
        }
    }

    /// Attach a commit-message directive to the canned patch.
    pub fn with_commit_message(mut self, message: &str) -> Self {
        if let Ok(patch) = &mut self.result {
            patch.commit_message = Some(message.to_string());
        }
        self
    }

    /// A generator that fails with a model-call error.
    pub fn failure(message: &str) -> Self {
        Self {
            result: Err(AgentError::ModelCall(message.to_string())),
        }
    }
}

#[async_trait]
impl PatchGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _issue: &IssueRef) -> Result<GeneratedPatch, AgentError> {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> IssueRef {
        IssueRef {
            number: 1,
            title: "Anything".to_string(),
            body: String::new(),
            labels: Vec::new(),
        }
    }

    #[tokio::test]
    async fn success_returns_patch() {
        let patch = MockGenerator::success("diff --git a/x b/x\n")
            .with_commit_message("fix x")
            .generate(&issue())
            .await
            .unwrap();
        assert_eq!(patch.diff, "diff --git a/x b/x\n");
        assert_eq!(patch.commit_message.as_deref(), Some("fix x"));
    }

    #[tokio::test]
    async fn failure_returns_model_error() {
        let err = MockGenerator::failure("overloaded")
            .generate(&issue())
            .await
            .unwrap_err();
        assert_eq!(err, AgentError::ModelCall("overloaded".to_string()));
    }
}
