//! Run phase - restore cached state, provision Gradle, run the build
//!
//! The restore and invocation halves of the step. An empty arguments
//! string is a deliberate no-op path: the step is being used purely to
//! prime the cache, so no executable is required and the phase succeeds.

use crate::caching::orchestrator;
use crate::cli::RunArgs;
use crate::config::{Inputs, StepConfig};
use crate::error::StepResult;
use crate::invoke::resolve::{
    parse_arguments, requested_version, resolve_build_root, resolve_executable,
    resolve_gradle_user_home,
};
use crate::invoke::{classify, execute};
use crate::provision::{bin_dir, DistProvisioner, Provisioner};
use crate::state::StateStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Execute the run phase
pub async fn run(args: RunArgs, workspace: &Path) -> StepResult<()> {
    let config = StepConfig::load(workspace).await?;
    let inputs = Inputs::merged(&args, &config);

    let build_root = resolve_build_root(workspace, inputs.build_root_directory.as_deref());
    debug!("Build root: {}", build_root.display());

    let store = StateStore::from_env();
    orchestrator::restore(&build_root, &inputs.cache, &store).await?;

    // Provision even when nothing will be invoked: a requested version on
    // the search path is part of priming the environment
    let provisioned: Option<PathBuf> =
        match requested_version(inputs.gradle_version.as_deref()) {
            Some(version) => Some(DistProvisioner::from_env().provision(version)?),
            None => None,
        };

    let argv = parse_arguments(&inputs.arguments)?;
    if argv.is_empty() {
        info!("No arguments provided: skipping Gradle invocation.");
        return Ok(());
    }

    let executable = resolve_executable(
        provisioned.as_deref(),
        inputs.gradle_executable.as_deref(),
        workspace,
        &build_root,
    )?;
    let gradle_user_home = resolve_gradle_user_home(&build_root);
    let path_prepend = provisioned.as_deref().and_then(bin_dir);

    let result = execute(
        &executable,
        &argv,
        &build_root,
        &gradle_user_home,
        path_prepend,
    )
    .await?;

    classify(&result)
}
