use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

pub fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

pub fn default_experiment() -> String {
    "internal_regulations".to_string()
}

pub fn default_model() -> String {
    "gpt-4o-2024-11-20".to_string()
}

pub fn default_request_timeout_sec() -> u64 {
    300
}

pub fn default_execution_timeout_sec() -> u64 {
    900 // 15 minutes
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub fn default_temperature() -> f32 {
    0.75
}

pub fn default_max_tokens() -> u32 {
    4096
}

pub fn default_claude_binary() -> PathBuf {
    // Check common install location first
    if let Some(home) = std::env::var_os("HOME") {
        let local_path = PathBuf::from(home).join(".claude/local/claude");
        if local_path.exists() {
            return local_path;
        }
    }
    // Fall back to PATH lookup
    PathBuf::from("claude")
}

pub fn default_permission_mode() -> String {
    "default".to_string()
}

pub fn default_codex_binary() -> PathBuf {
    PathBuf::from("codex")
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    1000
}

pub fn default_true() -> bool {
    true
}
