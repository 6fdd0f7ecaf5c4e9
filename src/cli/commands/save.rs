//! Save phase - persist Gradle state to cache and report
//!
//! Runs as a separate process at the end of the job. Must tolerate the
//! run phase never having executed.

use crate::caching::orchestrator;
use crate::cli::SaveArgs;
use crate::config::{CacheSettings, StepConfig};
use crate::error::StepResult;
use crate::state::StateStore;
use std::path::Path;

/// Execute the save phase
pub async fn save(args: SaveArgs, workspace: &Path) -> StepResult<()> {
    let config = StepConfig::load(workspace).await?;
    let settings = CacheSettings::merged(&args.cache, &config.cache);
    let store = StateStore::from_env();

    orchestrator::save(&settings, &store).await
}
