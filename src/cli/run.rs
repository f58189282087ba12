use crate::cli::RunArgs;
use crate::config::Config;
use crate::corpus::{retrieve_summary, FsRetriever, RegulationSummary};
use crate::error::RegrevError;
use crate::output::{self, CompiledReport, ReportCompiler, RunArtifacts};
use crate::planner::{generate_init_plan, Task};
use crate::provider::{create_runner, Runner};
use crate::runner::{ExecuteOptions, ExecutionReport, Orchestrator};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: ExecutionReport,
    pub artifacts: RunArtifacts,
    pub compiled: Option<CompiledReport>,
    /// False when the HTML report could not be produced
    pub success: bool,
}

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = args.corpus.load_config()?;
    args.service.apply(&mut config);
    args.bounds.apply(&mut config);
    if args.no_report {
        config.report.enabled = false;
    }
    config.validate()?;

    info!(
        "Experiment {} with {} ({})",
        config.experiment, config.provider, config.model
    );
    let runner = create_runner(&config)?;
    let outcome = run_pipeline(&config, runner, &args.query, args.skip_summary_file_creation).await?;

    print_outcome(&outcome);
    Ok(())
}

/// Summary, initial plan, execution loop, then the report
pub async fn run_pipeline(
    config: &Config,
    runner: Arc<dyn Runner>,
    query: &str,
    skip_summary: bool,
) -> Result<PipelineOutcome, RegrevError> {
    let base_dir = config.base_dir();
    let summary = retrieve_summary(&base_dir, skip_summary)?;

    let tasks = generate_init_plan(runner.as_ref(), &config.retry, query, &summary).await?;
    for task in &tasks {
        info!("Planned: {}", task);
    }

    execute_and_report(config, runner, query, &summary, tasks, config.report.enabled).await
}

/// Execution loop and artifacts for an already planned task list
pub async fn execute_and_report(
    config: &Config,
    runner: Arc<dyn Runner>,
    query: &str,
    summary: &RegulationSummary,
    tasks: Vec<Task>,
    with_report: bool,
) -> Result<PipelineOutcome, RegrevError> {
    let orchestrator = Orchestrator::new(
        runner.clone(),
        Arc::new(FsRetriever::new(&config.base_dir())),
        config.retry.clone(),
        ExecuteOptions {
            timeout: config.execution_timeout(),
            max_enqueued_tasks: config.execution.max_enqueued_tasks,
        },
    );
    let report = orchestrator.run(query, summary, tasks).await?;

    let results_dir = config.experiment_results_dir();
    let timestamp = output::timestamp();
    let artifacts =
        output::write_run_artifacts(&results_dir, &timestamp, query, summary, &report)?;
    info!("Results written to {:?}", artifacts.json_path);

    let mut outcome = PipelineOutcome {
        report,
        artifacts,
        compiled: None,
        success: true,
    };
    if !with_report {
        return Ok(outcome);
    }

    let compiler = ReportCompiler {
        runner: runner.as_ref(),
        retry: &config.retry,
        reflection: config.report.reflection,
    };
    match compiler
        .compile(&results_dir, &timestamp, query, &outcome.report.regulations)
        .await
    {
        Ok(compiled) => outcome.compiled = Some(compiled),
        Err(e) => {
            error!("Report generation failed: {}", e);
            outcome.success = false;
        }
    }
    Ok(outcome)
}

pub fn print_outcome(outcome: &PipelineOutcome) {
    print!("{}", format_outcome(outcome));
}

fn format_outcome(outcome: &PipelineOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::from("\n=== Regulation Review ===\n\n");
    out.push_str(&format!("Status: {}\n", report.status));
    out.push_str(&format!(
        "Reviewed: {} ({} updated), failed: {}, dropped: {}, remaining: {}\n",
        report.regulations.len(),
        report.updated_count(),
        report.failed.len(),
        report.dropped.len(),
        report.remaining.len()
    ));
    out.push_str(&format!("Results: {}\n", outcome.artifacts.json_path.display()));
    out.push_str(&format!("Summary: {}\n", outcome.artifacts.markdown_path.display()));
    if let Some(compiled) = &outcome.compiled {
        out.push_str(&format!("Report (ja, HTML): {}\n", compiled.japanese_path.display()));
        out.push_str(&format!("Report (en, HTML): {}\n", compiled.english_path.display()));
        out.push_str("Reports are HTML only; convert them to PDF with an external tool if needed.\n");
    }
    out.push_str(&format!("Success: {}\n", outcome.success));
    out
}
