//! HTTP client for an Anthropic-style messages endpoint.

use async_trait::async_trait;
use mendbot_core::{AgentError, GeneratedPatch, IssueRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::parse;
use crate::PatchGenerator;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client that turns an issue into a candidate patch with a single
/// bounded, low-temperature request to the messages endpoint.
pub struct ModelClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ModelClient {
    pub fn new(api_key: &str, model: &str, max_tokens: u32, temperature: f32) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, max_tokens, temperature)
    }

    /// Point the client at a different endpoint, e.g. a local proxy.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl PatchGenerator for ModelClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, issue: &IssueRef) -> Result<GeneratedPatch, AgentError> {
        let system = mendbot_prompts::system_instruction();
        let user = mendbot_prompts::user_instruction(issue);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: &system,
            messages: vec![Message {
                role: "user",
                content: &user,
            }],
        };

        info!(
            "requesting patch for issue #{} from {}",
            issue.number, self.model
        );
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ModelCall(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::ModelCall(format!(
                "provider returned {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::ModelCall(format!("invalid response body: {e}")))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();
        if text.is_empty() {
            return Err(AgentError::ModelCall(
                "response contained no text content".to_string(),
            ));
        }
        debug!("model returned {} bytes of output", text.len());

        Ok(parse::parse_patch_output(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ModelClient::with_base_url("http://localhost:8080/", "key", "m", 1024, 0.2);
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn request_serializes_to_messages_shape() {
        let request = MessagesRequest {
            model: "claude-sonnet-4",
            max_tokens: 8192,
            temperature: 0.2,
            system: "be terse",
            messages: vec![Message {
                role: "user",
                content: "hello",
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-sonnet-4");
        assert_eq!(value["max_tokens"], 8192);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }

    #[test]
    fn response_text_blocks_are_collected() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "diff --git a/x b/x\n"},
                {"type": "tool_use", "id": "t1", "name": "noop", "input": {}},
                {"type": "text", "text": "COMMIT: fix x"}
            ]
        }"#;

        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();
        assert_eq!(text, "diff --git a/x b/x\nCOMMIT: fix x");
    }
}
