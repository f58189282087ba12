use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegrevError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Data directory '{0}' does not exist")]
    MissingDataDir(PathBuf),

    #[error("Failed to walk data directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Failed to read summary file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write summary file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Data directory '{0}' does not exist")]
    MissingDataDir(PathBuf),

    #[error("Invalid file reference '{0}'")]
    InvalidReference(String),

    #[error("Regulation file '{0}' not found")]
    NotFound(String),

    #[error("Regulation file '{name}' matches several documents: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Unsupported document format for '{0}' (plain text only)")]
    UnsupportedFormat(String),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Execution timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Missing credentials: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("Response contained no content")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether a fresh attempt of the same request can succeed.
    ///
    /// Rejected credentials, malformed requests and CLI usage errors fail
    /// the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Timeout(_) | ProviderError::Io(_) | ProviderError::EmptyResponse => true,
            ProviderError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            ProviderError::NonZeroExit { .. } | ProviderError::MissingApiKey(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("User request is empty")]
    EmptyQuery,

    #[error("Regulation summary is empty")]
    EmptySummary,

    #[error("Failed to extract a JSON block from the planning response")]
    MissingStructuredBlock,

    #[error("Unexpected task payload: expected an object or a list of objects, got {0}")]
    UnexpectedShape(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to extract a JSON block from the {stage} response for '{file_name}'")]
    MissingStructuredBlock {
        stage: &'static str,
        file_name: String,
    },
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent regulation record: {0}")]
    Inconsistent(String),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Report generation failed at {step}: {source}")]
    Generate {
        step: &'static str,
        source: ProviderError,
    },
}
