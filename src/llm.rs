use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CompletionConfig;
use crate::error::CompletionError;

/// Sends one prompt to a hosted model and waits for the full reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat-completion client (Groq by default).
pub struct LLM {
    client: reqwest::Client,
    config: CompletionConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl LLM {
    pub fn new(config: CompletionConfig) -> Self {
        LLM {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionClient for LLM {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut req = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "sending completion request"
        );
        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, message });
        }

        let data: ChatResponse = resp.json().await?;
        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        info!(model = %self.config.model, answer_chars = content.len(), "completion received");
        Ok(content)
    }
}
