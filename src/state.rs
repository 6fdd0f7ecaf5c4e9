//! Cross-phase state persistence
//!
//! The run and save phases execute as separate OS processes. The only
//! channel between them is this store: one file per key in a job-scoped
//! directory, values round-tripping byte-exact. The host points the
//! store at the job scope via `GRADLE_STEP_STATE_DIR`.

use crate::error::{StepError, StepResult};
use std::path::PathBuf;
use tokio::fs;

/// Key under which the build root path is persisted
pub const BUILD_ROOT_DIR: &str = "BUILD_ROOT_DIR";

/// Key under which the serialized cache listener is persisted
pub const CACHE_LISTENER: &str = "CACHE_LISTENER";

/// File-backed key/value store scoped to one job run
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Create a store rooted at the host-provided state directory
    pub fn from_env() -> Self {
        let dir = std::env::var_os("GRADLE_STEP_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_dir);
        Self { dir }
    }

    /// Create a store rooted at a specific directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn default_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-step")
            .join("state")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a value; a missing key is `None`, never an error
    pub async fn get(&self, key: &str) -> StepResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path)
            .await
            .map_err(|e| StepError::io(format!("reading state key {}", key), e))?;
        Ok(Some(value))
    }

    /// Write a value, creating the store directory if needed
    pub async fn set(&self, key: &str, value: &str) -> StepResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StepError::io(format!("creating state dir {}", self.dir.display()), e))?;

        fs::write(self.key_path(key), value)
            .await
            .map_err(|e| StepError::io(format!("writing state key {}", key), e))
    }
}
