//! HTTP client for OpenAI-compatible chat completions.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parley_dialogue::{GenerationError, Generator, Message};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Sends prompts to a chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ClientConfig,
}

impl OpenAiClient {
    /// Create a client. The timeout covers the whole request.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one chat-completion request and return the first choice's text.
    pub async fn chat(&self, messages: &[Message]) -> ClientResult<String> {
        let request = build_request(&self.config, messages);
        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending chat completion"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
            tracing::warn!(%status, "completion service returned an error");
            return Err(ClientError::RequestFailed(format!(
                "{status}: {}",
                error_message(&body)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let text = first_choice(body)?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "chat completion received"
        );
        Ok(text)
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, GenerationError> {
        self.chat(&messages).await.map_err(GenerationError::from)
    }
}

fn build_request(config: &ClientConfig, messages: &[Message]) -> ChatRequest {
    ChatRequest {
        model: config.model.clone(),
        messages: messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str().to_string(),
                content: Some(m.text.clone()),
            })
            .collect(),
        temperature: config.temperature,
    }
}

fn first_choice(response: ChatResponse) -> ClientResult<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidResponse("no choices in response".to_string()))?;
    if choice.finish_reason.as_deref() == Some("length") {
        tracing::warn!("completion was cut off at the token limit");
    }
    Ok(choice.message.content.unwrap_or_default())
}

/// Pull `error.message` out of an error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
