//! Gradle distribution provisioning
//!
//! Resolves a requested version to an installed distribution's executable.
//! Channel aliases (`current`, `release-candidate`, `nightly`) are resolved
//! against the Gradle version service; downloading and unpacking
//! distributions is the installer's job, not this step's.

use crate::error::{StepError, StepResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(windows)]
const GRADLE_BIN: &str = "gradle.bat";
#[cfg(not(windows))]
const GRADLE_BIN: &str = "gradle";

const VERSION_SERVICE_BASE: &str = "https://services.gradle.org/versions";

/// Resolves a version input to a runnable Gradle executable
pub trait Provisioner: Send + Sync {
    /// Provision the given version and return the executable path
    fn provision(&self, version: &str) -> StepResult<PathBuf>;
}

/// Provisioner backed by a directory of installed distributions
///
/// Distributions live at `<dists>/gradle-<version>/bin/gradle`, the layout
/// produced by unpacking the official archives.
pub struct DistProvisioner {
    dists_dir: PathBuf,
}

impl DistProvisioner {
    /// Create a provisioner rooted at the host-provided dists directory
    pub fn from_env() -> Self {
        let dists_dir = std::env::var_os("GRADLE_STEP_DISTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_dists_dir);
        Self { dists_dir }
    }

    /// Create a provisioner rooted at a specific directory
    pub fn at(dists_dir: impl Into<PathBuf>) -> Self {
        Self {
            dists_dir: dists_dir.into(),
        }
    }

    fn default_dists_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-step")
            .join("dists")
    }

    fn locate(&self, version: &str) -> StepResult<PathBuf> {
        let executable = self
            .dists_dir
            .join(format!("gradle-{}", version))
            .join("bin")
            .join(GRADLE_BIN);

        if executable.is_file() {
            debug!("Located Gradle {} at {}", version, executable.display());
            Ok(executable)
        } else {
            Err(StepError::DistributionNotInstalled {
                version: version.to_string(),
                dir: self.dists_dir.clone(),
            })
        }
    }
}

impl Provisioner for DistProvisioner {
    fn provision(&self, version: &str) -> StepResult<PathBuf> {
        let resolved = resolve_channel(version)?;
        if resolved != version {
            info!("Resolved Gradle '{}' to version {}", version, resolved);
        }
        self.locate(&resolved)
    }
}

/// Resolve a channel alias through the Gradle version service
///
/// Concrete version strings pass through untouched.
fn resolve_channel(version: &str) -> StepResult<String> {
    let endpoint = match version {
        "current" => "current",
        "rc" | "release-candidate" => "release-candidate",
        "nightly" => "nightly",
        _ => return Ok(version.to_string()),
    };

    let url = format!("{}/{}", VERSION_SERVICE_BASE, endpoint);
    debug!("Querying Gradle version service: {}", url);

    let mut response = ureq::get(&url)
        .call()
        .map_err(|e| StepError::VersionService {
            channel: version.to_string(),
            reason: e.to_string(),
        })?;

    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| StepError::VersionService {
            channel: version.to_string(),
            reason: e.to_string(),
        })?;

    let payload: serde_json::Value = serde_json::from_str(&body)?;
    match payload.get("version").and_then(|v| v.as_str()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(StepError::VersionChannelEmpty(version.to_string())),
    }
}

/// The executable's containing directory, exposed on the child `PATH`
pub fn bin_dir(executable: &Path) -> Option<&Path> {
    executable.parent()
}
