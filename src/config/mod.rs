mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "regrev.yaml";

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            templates_dir: default_templates_dir(),
            results_dir: default_results_dir(),
            experiment: default_experiment(),
            provider: Provider::default(),
            model: default_model(),
            request_timeout_sec: default_request_timeout_sec(),
            execution: ExecutionConfig::default(),
            report: ReportConfig::default(),
            retry: RetryConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicit config file, or `regrev.yaml` if present, or defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.experiment.trim().is_empty() {
            return Err(ConfigError::Invalid("experiment name is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model name is empty".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.execution.max_enqueued_tasks == Some(0) {
            return Err(ConfigError::Invalid(
                "execution.max_enqueued_tasks must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Corpus root for the configured experiment
    pub fn base_dir(&self) -> PathBuf {
        self.templates_dir.join(&self.experiment)
    }

    /// Results folder for the configured experiment
    pub fn experiment_results_dir(&self) -> PathBuf {
        self.results_dir.join(&self.experiment)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution.timeout_sec)
    }
}
