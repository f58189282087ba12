pub mod execute;
pub mod plan;
pub mod run;
pub mod schema;
pub mod summary;

use crate::config::{Config, Provider};
use crate::error::ConfigError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "regrev")]
#[command(
    author,
    version,
    about = "Internal regulation review agent: plan, edit and report on policy changes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan, review every affected regulation and compile the report
    Run(RunArgs),

    /// Print the initial review plan as JSON
    Plan(PlanArgs),

    /// Review the regulations of a saved plan
    Execute(ExecuteArgs),

    /// Regenerate the regulation summary file
    Summary(CorpusArgs),

    /// Print JSON Schema for the config or the wire types
    Schema(SchemaArgs),
}

/// Where the corpus and the results live
#[derive(Args, Clone, Debug)]
pub struct CorpusArgs {
    /// Path to config file (default: ./regrev.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the templates directory holding the experiments
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Override the results directory
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Experiment (corpus) name under the templates directory
    #[arg(short, long, env = "REGREV_EXPERIMENT")]
    pub experiment: Option<String>,
}

/// Which decision service answers the prompts
#[derive(Args, Clone, Debug)]
pub struct ServiceArgs {
    /// Override the provider
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Override the model name
    #[arg(short, long, env = "REGREV_MODEL")]
    pub model: Option<String>,
}

/// Bounds on the execution loop
#[derive(Args, Clone, Debug)]
pub struct LoopArgs {
    /// Override the wall-clock budget of the execution loop
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Cap on the number of tasks ever enqueued
    #[arg(long)]
    pub max_tasks: Option<usize>,
}

#[derive(Parser, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub bounds: LoopArgs,

    /// Policy-change request to apply to the regulations
    #[arg(short, long)]
    pub query: String,

    /// Reuse the cached summary file instead of regenerating it
    #[arg(long)]
    pub skip_summary_file_creation: bool,

    /// Skip the HTML report
    #[arg(long)]
    pub no_report: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Policy-change request to plan for
    #[arg(short, long)]
    pub query: String,

    /// Reuse the cached summary file instead of regenerating it
    #[arg(long)]
    pub skip_summary_file_creation: bool,

    /// Write the tasks to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
pub struct ExecuteArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(flatten)]
    pub bounds: LoopArgs,

    /// Policy-change request the plan was made for
    #[arg(short, long)]
    pub query: String,

    /// JSON file with the planned tasks (output of `regrev plan`)
    #[arg(long)]
    pub tasks: PathBuf,

    /// Reuse the cached summary file instead of regenerating it
    #[arg(long)]
    pub skip_summary_file_creation: bool,

    /// Also compile the HTML report
    #[arg(long)]
    pub report: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct SchemaArgs {
    /// What to print the schema of
    #[arg(value_enum, default_value_t = SchemaKind::Config)]
    pub kind: SchemaKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    Config,
    Task,
    Regulation,
}

impl CorpusArgs {
    /// Resolve the config file and apply the directory overrides
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::resolve(self.config.as_deref())?;
        if let Some(path) = &self.config {
            info!("Loaded config from {:?}", path);
        }

        if let Some(dir) = &self.templates_dir {
            config.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        if let Some(experiment) = &self.experiment {
            config.experiment = experiment.clone();
        }
        Ok(config)
    }
}

impl ServiceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
    }
}

impl LoopArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout_sec {
            config.execution.timeout_sec = timeout;
        }
        if let Some(max) = self.max_tasks {
            config.execution.max_enqueued_tasks = Some(max);
        }
    }
}
