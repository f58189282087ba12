use super::process::{command_for, run_command};
use super::{extend_history, render_transcript, ChatMessage, ProviderOutput, Runner};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub struct ClaudeRunner {
    pub binary: PathBuf,
    pub model: String,
    pub tools: Vec<String>,
    pub permission_mode: String,
    pub timeout: Duration,
}

#[async_trait]
impl Runner for ClaudeRunner {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn submit(
        &self,
        system: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ProviderOutput, ProviderError> {
        let prompt = render_transcript(history, message);

        let mut cmd = command_for(&self.binary);

        // Ensure subscription auth is used (not API key)
        cmd.env_remove("ANTHROPIC_API_KEY");

        cmd.arg("-p")
            .arg(&prompt)
            .arg("--system-prompt")
            .arg(system)
            .arg("--model")
            .arg(&self.model)
            .arg("--output-format")
            .arg("json")
            .arg("--permission-mode")
            .arg(&self.permission_mode);

        if !self.tools.is_empty() {
            cmd.arg("--allowedTools").arg(self.tools.join(","));
        }

        let start = std::time::Instant::now();
        let output = run_command(cmd, None, self.timeout).await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let content = unwrap_result(&stdout);
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

/// `--output-format json` wraps the answer in {"result": "...", ...}
fn unwrap_result(stdout: &str) -> String {
    #[derive(Deserialize)]
    struct ClaudeOutput {
        result: String,
    }

    match serde_json::from_str::<ClaudeOutput>(stdout) {
        Ok(out) => out.result,
        Err(_) => stdout.to_string(),
    }
}
