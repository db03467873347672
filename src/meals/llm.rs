use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion had no content")]
    EmptyCompletion,
}

/// Single-turn chat completion. Returns the raw assistant text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature,
        };

        let res = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = res.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ChatError::EmptyCompletion)?;
        debug!(model = %self.model, len = content.len(), "completion received");
        Ok(content)
    }
}
