use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod corpus;
mod error;
mod output;
mod parser;
mod planner;
mod prompt;
mod provider;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise only warnings unless --verbose
    let default_directive = if cli.verbose {
        "regrev=debug"
    } else {
        "regrev=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Plan(args) => cli::plan::execute(args).await,
        Commands::Execute(args) => cli::execute::execute(args).await,
        Commands::Summary(args) => cli::summary::execute(args),
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
