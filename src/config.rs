//! Optional project-local configuration
//!
//! A `gradle-step.toml` in the workspace supplies defaults for the step
//! inputs. Flags and environment variables always win over the file.

use crate::cli::{CacheArgs, RunArgs};
use crate::error::{StepError, StepResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Config file name looked up in the workspace
pub const CONFIG_FILE: &str = "gradle-step.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Gradle invocation defaults
    pub gradle: GradleConfig,

    /// Cache defaults
    pub cache: CacheConfig,
}

/// Gradle invocation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GradleConfig {
    /// Gradle version to provision ('wrapper' or empty = use the wrapper)
    pub version: Option<String>,

    /// Explicit Gradle executable, resolved against the workspace
    pub executable: Option<PathBuf>,

    /// Build root directory, resolved against the workspace
    pub build_root_directory: Option<PathBuf>,
}

/// Cache settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disable caching entirely
    pub disabled: bool,

    /// Restore from the cache but never write back to it
    pub read_only: bool,

    /// Cache storage root
    pub directory: Option<PathBuf>,
}

impl StepConfig {
    /// Load the workspace config file, or defaults when absent
    pub async fn load(workspace: &Path) -> StepResult<Self> {
        let path = workspace.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StepError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| StepError::ConfigInvalid {
            path,
            reason: e.to_string(),
        })
    }
}

/// Effective step inputs after merging CLI/env over the config file
#[derive(Debug, Clone)]
pub struct Inputs {
    pub gradle_version: Option<String>,
    pub gradle_executable: Option<PathBuf>,
    pub build_root_directory: Option<PathBuf>,
    pub arguments: String,
    pub cache: CacheSettings,
}

/// Effective cache settings
#[derive(Debug, Clone, Default)]
pub struct CacheSettings {
    pub disabled: bool,
    pub read_only: bool,
    pub directory: Option<PathBuf>,
}

impl CacheSettings {
    /// Merge cache flags over file config
    pub fn merged(args: &CacheArgs, config: &CacheConfig) -> Self {
        Self {
            disabled: args.cache_disabled || config.disabled,
            read_only: args.cache_read_only || config.read_only,
            directory: args.cache_directory.clone().or_else(|| config.directory.clone()),
        }
    }
}

impl Inputs {
    /// Merge run-phase flags over file config
    pub fn merged(args: &RunArgs, config: &StepConfig) -> Self {
        Self {
            gradle_version: args
                .gradle_version
                .clone()
                .or_else(|| config.gradle.version.clone()),
            gradle_executable: args
                .gradle_executable
                .clone()
                .or_else(|| config.gradle.executable.clone()),
            build_root_directory: args
                .build_root_directory
                .clone()
                .or_else(|| config.gradle.build_root_directory.clone()),
            arguments: args.arguments.clone().unwrap_or_default(),
            cache: CacheSettings::merged(&args.cache, &config.cache),
        }
    }
}
