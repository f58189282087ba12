use super::{extend_history, ChatMessage, ProviderOutput, Role, Runner};
use crate::config::OpenAiConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat-completions client for OpenAI and compatible endpoints
pub struct OpenAiRunner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiRunner {
    pub fn from_config(
        config: &OpenAiConfig,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| ProviderError::MissingApiKey(config.api_key_env.clone()))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request<'a>(
        &'a self,
        system: &'a str,
        message: &'a str,
        history: &'a [ChatMessage],
    ) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(WireMessage {
            role: "system",
            content: system,
        });
        for turn in history {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &turn.content,
            });
        }
        messages.push(WireMessage {
            role: "user",
            content: message,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl Runner for OpenAiRunner {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn submit(
        &self,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, ProviderError> {
        let start = std::time::Instant::now();
        let request = self.build_request(system, message, history);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ProviderOutput {
            history: extend_history(history, message, &content),
            content,
            duration: start.elapsed(),
        })
    }
}
