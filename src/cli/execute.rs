//! CLI handler for the `execute` subcommand

use crate::cli::run::{execute_and_report, print_outcome};
use crate::cli::ExecuteArgs;
use crate::corpus::retrieve_summary;
use crate::planner::{parse_tasks, Task};
use crate::provider::create_runner;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

pub async fn execute(args: ExecuteArgs) -> anyhow::Result<()> {
    let mut config = args.corpus.load_config()?;
    args.service.apply(&mut config);
    args.bounds.apply(&mut config);
    config.validate()?;

    let tasks = load_tasks(&args.tasks)?;
    info!("Loaded {} task(s) from {:?}", tasks.len(), args.tasks);

    let summary = retrieve_summary(&config.base_dir(), args.skip_summary_file_creation)?;
    let runner = create_runner(&config)?;
    let outcome =
        execute_and_report(&config, runner, &args.query, &summary, tasks, args.report).await?;

    print_outcome(&outcome);
    Ok(())
}

/// Read a saved plan: a task list or a single task object
pub fn load_tasks(path: &Path) -> anyhow::Result<Vec<Task>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read tasks file {:?}", path))?;
    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Tasks file {:?} is not valid JSON", path))?;
    Ok(parse_tasks(&payload)?)
}
