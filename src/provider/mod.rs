mod claude;
mod codex;
mod openai;
mod process;
#[cfg(test)]
pub mod scripted;

pub use claude::ClaudeRunner;
pub use codex::CodexRunner;
pub use openai::OpenAiRunner;

use crate::config::{Config, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a prior exchange with the decision service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug)]
pub struct ProviderOutput {
    /// Response text
    pub content: String,
    /// Prior history followed by this request and its response
    pub history: Vec<ChatMessage>,
    pub duration: Duration,
}

/// The decision service: one request with a system context and optional
/// prior exchange, answered with free text.
#[async_trait]
pub trait Runner: Send + Sync {
    fn name(&self) -> &'static str;

    async fn submit(
        &self,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, ProviderError>;
}

/// Create the runner selected by the config
pub fn create_runner(config: &Config) -> Result<Arc<dyn Runner>, ProviderError> {
    let timeout = config.request_timeout();
    let runner: Arc<dyn Runner> = match config.provider {
        Provider::Openai => Arc::new(OpenAiRunner::from_config(
            &config.providers.openai,
            &config.model,
            timeout,
        )?),
        Provider::ClaudeCli => Arc::new(ClaudeRunner {
            binary: config.providers.claude_cli.binary.clone(),
            model: config.model.clone(),
            tools: config.providers.claude_cli.tools.clone(),
            permission_mode: config.providers.claude_cli.permission_mode.clone(),
            timeout,
        }),
        Provider::CodexCli => Arc::new(CodexRunner {
            binary: config.providers.codex_cli.binary.clone(),
            model: config.model.clone(),
            timeout,
        }),
    };
    Ok(runner)
}

/// History after a completed exchange
pub(crate) fn extend_history(
    history: &[ChatMessage],
    message: &str,
    content: &str,
) -> Vec<ChatMessage> {
    let mut next = history.to_vec();
    next.push(ChatMessage::user(message));
    next.push(ChatMessage::assistant(content));
    next
}

/// Flatten a prior exchange and the new message into one prompt, for
/// providers driven through a single-shot CLI
pub(crate) fn render_transcript(history: &[ChatMessage], message: &str) -> String {
    if history.is_empty() {
        return message.to_string();
    }

    let mut prompt = String::from("## Conversation so far\n\n");
    for turn in history {
        let label = match turn.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        prompt.push_str(&format!("### {}\n\n{}\n\n", label, turn.content));
    }
    prompt.push_str("## Current request\n\n");
    prompt.push_str(message);
    prompt
}
