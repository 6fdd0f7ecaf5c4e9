//! Gradle subprocess execution and result classification
//!
//! One blocking child execution per invocation; the step waits for
//! completion and captures the exit status. If the build emitted a build
//! scan, its URL is picked up opaquely from a marker file written by the
//! scan-capture init script; no Gradle output parsing happens here.

use crate::error::{StepError, StepResult};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Marker file (relative to the build root) carrying the build scan URL
pub const BUILD_SCAN_FILE: &str = "gradle-build-scan.txt";

/// Outcome of one Gradle invocation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the Gradle process
    pub status: i32,

    /// Build scan URL, present only if the build emitted one
    pub build_scan_url: Option<String>,
}

/// Run Gradle from the build root with inherited stdio
///
/// `path_prepend` exposes a provisioned distribution's bin directory to
/// nested invocations through the child's `PATH`.
pub async fn execute(
    executable: &Path,
    args: &[String],
    build_root: &Path,
    gradle_user_home: &Path,
    path_prepend: Option<&Path>,
) -> StepResult<ExecutionResult> {
    debug!(
        "Executing: {} {:?} (cwd: {})",
        executable.display(),
        args,
        build_root.display()
    );

    let mut command = Command::new(executable);
    command
        .args(args)
        .current_dir(build_root)
        .env("GRADLE_USER_HOME", gradle_user_home)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(dir) = path_prepend {
        command.env("PATH", prepend_search_path(dir));
    }

    let status = command
        .status()
        .await
        .map_err(|e| StepError::command_failed(executable.display().to_string(), e))?;

    let build_scan_url = read_build_scan_url(build_root).await;

    Ok(ExecutionResult {
        status: status.code().unwrap_or(-1),
        build_scan_url,
    })
}

/// Turn an execution result into job success or failure
///
/// A build scan URL is the preferred diagnostic surface; fall back to the
/// raw status when the build did not emit one.
pub fn classify(result: &ExecutionResult) -> StepResult<()> {
    if result.status == 0 {
        return Ok(());
    }

    match &result.build_scan_url {
        Some(url) => Err(StepError::BuildFailedWithScan { url: url.clone() }),
        None => Err(StepError::BuildFailed {
            status: result.status,
        }),
    }
}

fn prepend_search_path(dir: &Path) -> OsString {
    match std::env::var_os("PATH") {
        Some(current) => {
            let mut paths = vec![dir.to_path_buf()];
            paths.extend(std::env::split_paths(&current));
            std::env::join_paths(paths).unwrap_or(current)
        }
        None => dir.as_os_str().to_os_string(),
    }
}

/// Last non-empty line of the scan marker file, if the build wrote one
async fn read_build_scan_url(build_root: &Path) -> Option<String> {
    let content = tokio::fs::read_to_string(build_root.join(BUILD_SCAN_FILE))
        .await
        .ok()?;
    content
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
