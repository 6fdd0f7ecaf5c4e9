//! Invocation resolution
//!
//! Determines the exact command to run: the build root relative to the
//! workspace, the Gradle user home, the executable (provisioned version,
//! explicit override, or discovered wrapper, in that fixed order), and the
//! argv vector parsed from the free-form arguments string.

use crate::error::{StepError, StepResult};
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(windows)]
const WRAPPER_NAME: &str = "gradlew.bat";
#[cfg(not(windows))]
const WRAPPER_NAME: &str = "gradlew";

/// Resolve the build root against the workspace
///
/// An absent or empty input means the workspace itself; a relative input
/// is resolved against it.
pub fn resolve_build_root(workspace: &Path, input: Option<&Path>) -> PathBuf {
    match input {
        Some(path) if !path.as_os_str().is_empty() => {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                workspace.join(path)
            }
        }
        _ => workspace.to_path_buf(),
    }
}

/// Resolve the Gradle user home
///
/// A `GRADLE_USER_HOME` override is resolved against the build root;
/// otherwise the fixed default under the caller's home directory.
pub fn resolve_gradle_user_home(build_root: &Path) -> PathBuf {
    match std::env::var_os("GRADLE_USER_HOME") {
        Some(value) if !value.is_empty() => {
            let path = PathBuf::from(value);
            if path.is_absolute() {
                path
            } else {
                build_root.join(path)
            }
        }
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gradle"),
    }
}

/// Whether the version input asks for a provisioned distribution
///
/// Empty and the sentinel `"wrapper"` both mean "use the discovered
/// wrapper" and return `None`.
pub fn requested_version(input: Option<&str>) -> Option<&str> {
    match input {
        Some(v) if !v.is_empty() && v != "wrapper" => Some(v),
        _ => None,
    }
}

/// Locate the wrapper script directly under the build root
pub fn locate_wrapper(build_root: &Path) -> StepResult<PathBuf> {
    let wrapper = build_root.join(WRAPPER_NAME);
    if wrapper.is_file() {
        Ok(wrapper)
    } else {
        Err(StepError::WrapperMissing(wrapper))
    }
}

/// Pick the executable: provisioned, then explicit override, then wrapper
///
/// Exactly one of the three paths is taken per run.
pub fn resolve_executable(
    provisioned: Option<&Path>,
    explicit: Option<&Path>,
    workspace: &Path,
    build_root: &Path,
) -> StepResult<PathBuf> {
    if let Some(path) = provisioned {
        debug!("Using provisioned Gradle: {}", path.display());
        return Ok(path.to_path_buf());
    }

    if let Some(path) = explicit {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace.join(path)
        };
        debug!("Using explicit Gradle executable: {}", resolved.display());
        return Ok(resolved);
    }

    let wrapper = locate_wrapper(build_root)?;
    debug!("Using Gradle wrapper: {}", wrapper.display());
    Ok(wrapper)
}

/// Tokenize the arguments string with shell quoting rules
///
/// An empty result is a valid signal (the invocation is skipped), not an
/// error; unbalanced quoting is.
pub fn parse_arguments(input: &str) -> StepResult<Vec<String>> {
    shlex::split(input).ok_or_else(|| StepError::ArgumentsInvalid(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn build_root_defaults_to_workspace() {
        let workspace = Path::new("/work");
        assert_eq!(resolve_build_root(workspace, None), PathBuf::from("/work"));
        assert_eq!(
            resolve_build_root(workspace, Some(Path::new(""))),
            PathBuf::from("/work")
        );
    }

    #[test]
    fn build_root_relative_and_absolute() {
        let workspace = Path::new("/work");
        assert_eq!(
            resolve_build_root(workspace, Some(Path::new("sub/project"))),
            PathBuf::from("/work/sub/project")
        );
        assert_eq!(
            resolve_build_root(workspace, Some(Path::new("/elsewhere"))),
            PathBuf::from("/elsewhere")
        );
    }

    #[test]
    #[serial]
    fn gradle_user_home_default() {
        std::env::remove_var("GRADLE_USER_HOME");
        let home = resolve_gradle_user_home(Path::new("/work"));
        assert!(home.ends_with(".gradle"));
    }

    #[test]
    #[serial]
    fn gradle_user_home_override() {
        std::env::set_var("GRADLE_USER_HOME", "/custom/gradle-home");
        let home = resolve_gradle_user_home(Path::new("/work"));
        std::env::remove_var("GRADLE_USER_HOME");
        assert_eq!(home, PathBuf::from("/custom/gradle-home"));
    }

    #[test]
    #[serial]
    fn gradle_user_home_relative_override() {
        std::env::set_var("GRADLE_USER_HOME", ".gradle-home");
        let home = resolve_gradle_user_home(Path::new("/work"));
        std::env::remove_var("GRADLE_USER_HOME");
        assert_eq!(home, PathBuf::from("/work/.gradle-home"));
    }

    #[test]
    fn requested_version_sentinels() {
        assert_eq!(requested_version(None), None);
        assert_eq!(requested_version(Some("")), None);
        assert_eq!(requested_version(Some("wrapper")), None);
        assert_eq!(requested_version(Some("8.5")), Some("8.5"));
    }

    #[test]
    fn executable_priority_provisioned_first() {
        // Provisioned wins even when an explicit override is also set
        let exe = resolve_executable(
            Some(Path::new("/dists/gradle-8.5/bin/gradle")),
            Some(Path::new("/override/gradle")),
            Path::new("/work"),
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(exe, PathBuf::from("/dists/gradle-8.5/bin/gradle"));
    }

    #[test]
    fn executable_priority_explicit_over_wrapper() {
        let exe = resolve_executable(
            None,
            Some(Path::new("tools/gradle")),
            Path::new("/work"),
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(exe, PathBuf::from("/work/tools/gradle"));
    }

    #[test]
    fn executable_falls_back_to_wrapper() {
        let build_root = TempDir::new().unwrap();
        let wrapper = build_root.path().join(WRAPPER_NAME);
        std::fs::write(&wrapper, "#!/bin/sh\n").unwrap();

        let exe = resolve_executable(None, None, Path::new("/work"), build_root.path()).unwrap();
        assert_eq!(exe, wrapper);
    }

    #[test]
    fn missing_wrapper_is_an_error() {
        let build_root = TempDir::new().unwrap();
        let err = resolve_executable(None, None, Path::new("/work"), build_root.path()).unwrap_err();
        assert!(matches!(err, StepError::WrapperMissing(_)));
    }

    #[test]
    fn parse_arguments_quoting() {
        assert_eq!(
            parse_arguments("build --scan -PfooBar=\"a b\"").unwrap(),
            vec!["build", "--scan", "-PfooBar=a b"]
        );
    }

    #[test]
    fn parse_arguments_empty() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_arguments_unbalanced_quote() {
        let err = parse_arguments("build 'unterminated").unwrap_err();
        assert!(matches!(err, StepError::ArgumentsInvalid(_)));
    }
}
