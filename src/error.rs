//! Error types for gradle-step
//!
//! All modules use `StepResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gradle-step operations
pub type StepResult<T> = Result<T, StepError>;

/// All errors that can occur in gradle-step
#[derive(Error, Debug)]
pub enum StepError {
    // Input errors
    #[error("Invalid arguments input (unbalanced quoting): {0}")]
    ArgumentsInvalid(String),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Provisioning errors
    #[error("Gradle distribution {version} not installed under {dir}")]
    DistributionNotInstalled { version: String, dir: PathBuf },

    #[error("Failed to query the Gradle version service for '{channel}': {reason}")]
    VersionService { channel: String, reason: String },

    #[error("The Gradle version service has no release for channel '{0}'")]
    VersionChannelEmpty(String),

    // Wrapper errors
    #[error("Gradle wrapper not found at {0}")]
    WrapperMissing(PathBuf),

    // Cache errors
    #[error("Cache storage unavailable at {path}: {reason}")]
    CacheStoreUnavailable { path: PathBuf, reason: String },

    #[error("Failed to restore cache entry {name}: {reason}")]
    CacheEntryRestore { name: String, reason: String },

    #[error("Failed to save cache entry {name}: {reason}")]
    CacheEntrySave { name: String, reason: String },

    #[error("Corrupt cache listener state: {0}")]
    ListenerCorrupt(#[source] serde_json::Error),

    // Build outcome
    #[error("Gradle build failed: {url}")]
    BuildFailedWithScan { url: String },

    #[error("Gradle process exited with status {status}")]
    BuildFailed { status: i32 },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StepError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DistributionNotInstalled { .. } => {
                Some("Install the distribution under the dists directory, or set gradle-version to 'wrapper'")
            }
            Self::WrapperMissing(_) => {
                Some("Commit the Gradle wrapper to the repository, or set the gradle-executable input")
            }
            Self::BuildFailedWithScan { .. } => Some("Open the build scan for details"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StepError::BuildFailed { status: 1 };
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn error_display_with_scan() {
        let err = StepError::BuildFailedWithScan {
            url: "https://gradle.com/s/abc123".to_string(),
        };
        assert!(err.to_string().contains("https://gradle.com/s/abc123"));
    }

    #[test]
    fn error_hint() {
        let err = StepError::WrapperMissing(PathBuf::from("/work/gradlew"));
        assert!(err.hint().unwrap().contains("gradle-executable"));
    }

}
