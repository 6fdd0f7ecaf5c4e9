//! gradle-step - Gradle CI step
//!
//! CLI entry point that dispatches to the run and save phases.

use clap::Parser;
use console::style;
use gradle_step::cli::{Cli, Commands};
use gradle_step::error::StepResult;
use std::error::Error;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            // Best-effort trace of the underlying cause chain
            let mut source = e.source();
            while let Some(cause) = source {
                debug!("Caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StepResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = info (CI logs are the product), 1+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("gradle_step=info"),
        _ => EnvFilter::new("gradle_step=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let workspace = cli.workspace_dir()?;
    debug!("Workspace directory: {}", workspace.display());

    match cli.command {
        Commands::Run(args) => gradle_step::cli::commands::run(args, &workspace).await,
        Commands::Save(args) => gradle_step::cli::commands::save(args, &workspace).await,
    }
}
