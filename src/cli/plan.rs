//! CLI handler for the `plan` subcommand

use crate::cli::PlanArgs;
use crate::corpus::retrieve_summary;
use crate::planner::generate_init_plan;
use crate::provider::create_runner;
use std::fs;
use tracing::info;

pub async fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let mut config = args.corpus.load_config()?;
    args.service.apply(&mut config);
    config.validate()?;

    let summary = retrieve_summary(&config.base_dir(), args.skip_summary_file_creation)?;
    let runner = create_runner(&config)?;
    let tasks = generate_init_plan(runner.as_ref(), &config.retry, &args.query, &summary).await?;

    let json = serde_json::to_string_pretty(&tasks)?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            info!("Wrote {} task(s) to {:?}", tasks.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
