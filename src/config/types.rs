use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding one corpus per experiment
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Directory receiving one results folder per experiment
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    #[serde(default = "default_experiment")]
    pub experiment: String,

    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout for the decision service
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExecutionConfig {
    /// Wall-clock budget for the execution loop
    #[serde(default = "default_execution_timeout_sec")]
    pub timeout_sec: u64,

    /// Cap on the total number of tasks ever enqueued (unbounded when unset)
    #[serde(default)]
    pub max_enqueued_tasks: Option<usize>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_sec: default_execution_timeout_sec(),
            max_enqueued_tasks: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ask the service to review and regenerate its first draft
    #[serde(default = "default_true")]
    pub reflection: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reflection: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub claude_cli: ClaudeCliConfig,

    #[serde(default)]
    pub codex_cli: CodexCliConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key_env: default_openai_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClaudeCliConfig {
    #[serde(default = "default_claude_binary")]
    pub binary: PathBuf,

    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default = "default_permission_mode")]
    pub permission_mode: String,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            tools: Vec::new(),
            permission_mode: default_permission_mode(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CodexCliConfig {
    #[serde(default = "default_codex_binary")]
    pub binary: PathBuf,
}

impl Default for CodexCliConfig {
    fn default() -> Self {
        Self {
            binary: default_codex_binary(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Openai,
    ClaudeCli,
    CodexCli,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Openai => write!(f, "openai"),
            Provider::ClaudeCli => write!(f, "claude_cli"),
            Provider::CodexCli => write!(f, "codex_cli"),
        }
    }
}
