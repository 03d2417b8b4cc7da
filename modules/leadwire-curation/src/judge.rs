use anyhow::Result;
use async_trait::async_trait;

use ai_client::OpenAi;

/// System prompt for every judgment call.
const EDITOR_SYSTEM_PROMPT: &str = "You are an expert news editor with decades of experience in \
editorial decision-making. Your role is to evaluate and prioritize news events based on their \
impact, significance, and newsworthiness. Focus on quality over quantity, selecting only the \
most important stories that deserve in-depth coverage.";

/// The external judgment capability: one prompt in, raw response text out.
///
/// Implementations own the model choice and transport. The engine never
/// retries a call — malformed or failed responses degrade via documented
/// fallbacks, bounding latency and cost at one call per stage invocation
/// (or one per similarity group).
#[async_trait]
pub trait Judge: Send + Sync {
    /// Submit a prompt, optionally with a JSON schema the response should
    /// conform to. The schema is a hint — callers must still parse
    /// tolerantly, since not every backing model enforces it.
    async fn submit(&self, prompt: &str, schema_hint: Option<serde_json::Value>)
        -> Result<String>;
}

/// Judge backed by the OpenAI chat-completions API.
pub struct OpenAiJudge {
    agent: OpenAi,
}

impl OpenAiJudge {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            agent: OpenAi::new(api_key, model),
        }
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn submit(
        &self,
        prompt: &str,
        schema_hint: Option<serde_json::Value>,
    ) -> Result<String> {
        match schema_hint {
            Some(schema) => {
                self.agent
                    .chat_completion_with_schema(EDITOR_SYSTEM_PROMPT, prompt, schema)
                    .await
            }
            None => self.agent.chat_completion(EDITOR_SYSTEM_PROMPT, prompt).await,
        }
    }
}
