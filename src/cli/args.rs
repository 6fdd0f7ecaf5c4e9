//! CLI argument definitions using clap derive
//!
//! Step inputs arrive either as flags or through `GRADLE_STEP_*`
//! environment variables set by the host CI system.

use crate::error::{StepError, StepResult};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// gradle-step - Gradle CI step
///
/// Provisions and invokes Gradle for a CI job while caching the Gradle
/// user home between job runs.
#[derive(Parser, Debug)]
#[command(name = "gradle-step")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Phase to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Workspace directory the job checked out into
    #[arg(long, global = true, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

impl Cli {
    /// Resolve the workspace directory, falling back to the current directory
    pub fn workspace_dir(&self) -> StepResult<PathBuf> {
        match &self.workspace {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir()
                .map_err(|e| StepError::io("getting current directory", e)),
        }
    }
}

/// Available phases
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore cached Gradle state, provision Gradle, and run the build
    Run(RunArgs),

    /// Save Gradle state to the cache and print the caching summary
    Save(SaveArgs),
}

/// Arguments for the run phase
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Gradle version to provision ('wrapper' or empty = use the wrapper)
    #[arg(long, env = "GRADLE_STEP_GRADLE_VERSION")]
    pub gradle_version: Option<String>,

    /// Explicit Gradle executable, resolved against the workspace
    #[arg(long, env = "GRADLE_STEP_GRADLE_EXECUTABLE")]
    pub gradle_executable: Option<PathBuf>,

    /// Build root directory, resolved against the workspace
    #[arg(long, env = "GRADLE_STEP_BUILD_ROOT_DIRECTORY")]
    pub build_root_directory: Option<PathBuf>,

    /// Gradle command line as a single shell-quoted string
    #[arg(long, env = "GRADLE_STEP_ARGUMENTS")]
    pub arguments: Option<String>,

    #[command(flatten)]
    pub cache: CacheArgs,
}

/// Arguments for the save phase
#[derive(Parser, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub cache: CacheArgs,
}

/// Cache flags shared by both phases
#[derive(Parser, Debug, Clone)]
pub struct CacheArgs {
    /// Disable caching entirely
    #[arg(long, env = "GRADLE_STEP_CACHE_DISABLED")]
    pub cache_disabled: bool,

    /// Restore from the cache but never write back to it
    #[arg(long, env = "GRADLE_STEP_CACHE_READ_ONLY")]
    pub cache_read_only: bool,

    /// Cache storage root (default: user cache dir)
    #[arg(long, env = "GRADLE_STEP_CACHE_DIR")]
    pub cache_directory: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_inputs() {
        let cli = Cli::parse_from([
            "gradle-step",
            "run",
            "--gradle-version",
            "8.5",
            "--arguments",
            "build --scan",
            "--cache-read-only",
        ]);

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.gradle_version.as_deref(), Some("8.5"));
                assert_eq!(args.arguments.as_deref(), Some("build --scan"));
                assert!(args.cache.cache_read_only);
                assert!(!args.cache.cache_disabled);
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn parse_save_defaults() {
        let cli = Cli::parse_from(["gradle-step", "save"]);
        match cli.command {
            Commands::Save(args) => {
                assert!(!args.cache.cache_disabled);
                assert!(args.cache.cache_directory.is_none());
            }
            _ => panic!("expected save subcommand"),
        }
    }
}
