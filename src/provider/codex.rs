use super::process::{command_for, run_command};
use super::{extend_history, render_transcript, ChatMessage, ProviderOutput, Runner};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

pub struct CodexRunner {
    pub binary: PathBuf,
    pub model: String,
    pub timeout: Duration,
}

#[async_trait]
impl Runner for CodexRunner {
    fn name(&self) -> &'static str {
        "codex_cli"
    }

    async fn submit(
        &self,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, ProviderError> {
        // codex exec has no separate system channel
        let full_prompt = format!("{}\n\n---\n\n{}", system, render_transcript(history, message));

        // Capture final assistant message to a temp file
        let out_file = NamedTempFile::new().map_err(ProviderError::Io)?;

        let mut cmd = command_for(&self.binary);
        cmd.arg("exec")
            .arg("--model")
            .arg(&self.model)
            .arg("--json")
            .arg("--output-last-message")
            .arg(out_file.path())
            // Read prompt from stdin
            .arg("-");

        let start = std::time::Instant::now();
        run_command(cmd, Some(full_prompt.as_bytes()), self.timeout).await?;

        let content = tokio::fs::read_to_string(out_file.path())
            .await
            .map_err(ProviderError::Io)?;
        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(ProviderOutput {
            history: extend_history(history, message, &content),
            content,
            duration: start.elapsed(),
        })
    }
}
