//! Cache storage backend abstraction
//!
//! The orchestrator only knows `restore(key) -> entry` and
//! `save(key, paths)`; compression, upload, and transfer belong to the
//! backend. The production backend stores entries as directory trees on
//! local disk, which is what self-hosted runners mount as shared storage.

use crate::error::{StepError, StepResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result of restoring a cache entry
#[derive(Debug, Clone)]
pub struct RestoredEntry {
    /// Key that matched (the requested key, or a fallback match)
    pub key: String,
    /// Bytes restored
    pub size_bytes: u64,
}

/// Result of saving a cache entry
#[derive(Debug, Clone)]
pub struct SavedEntry {
    /// Key the entry was stored under
    pub key: String,
    /// Bytes saved
    pub size_bytes: u64,
}

/// Abstract cache storage interface
///
/// `restore` tries the exact key first, then the newest entry matching any
/// of the fallback prefixes. A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Restore the entry for `requested_key` into `target`
    async fn restore(
        &self,
        requested_key: &str,
        fallback_prefixes: &[String],
        target: &Path,
    ) -> StepResult<Option<RestoredEntry>>;

    /// Save `paths` (relative to `base`) under `key`
    async fn save(&self, key: &str, base: &Path, paths: &[String]) -> StepResult<SavedEntry>;
}

/// Cache backend storing entries as directory trees under a storage root
#[derive(Debug)]
pub struct DirectoryCacheBackend {
    root: PathBuf,
}

impl DirectoryCacheBackend {
    /// Open the backend, creating the storage root if needed
    ///
    /// An uncreatable root is an infrastructure error and fails the phase.
    pub fn open(root: impl Into<PathBuf>) -> StepResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StepError::CacheStoreUnavailable {
            path: root.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { root })
    }

    /// Default storage root under the user cache directory
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-step")
            .join("cache-entries")
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Newest stored entry whose key starts with any of the prefixes
    fn find_fallback(&self, prefixes: &[String]) -> StepResult<Option<String>> {
        let mut best: Option<(std::time::SystemTime, String)> = None;

        let entries = std::fs::read_dir(&self.root).map_err(|e| StepError::CacheStoreUnavailable {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !prefixes.iter().any(|p| name.starts_with(p.as_str())) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            if best.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                best = Some((modified, name));
            }
        }

        Ok(best.map(|(_, name)| name))
    }
}

#[async_trait]
impl CacheBackend for DirectoryCacheBackend {
    async fn restore(
        &self,
        requested_key: &str,
        fallback_prefixes: &[String],
        target: &Path,
    ) -> StepResult<Option<RestoredEntry>> {
        let matched = if self.entry_dir(requested_key).is_dir() {
            Some(requested_key.to_string())
        } else {
            self.find_fallback(fallback_prefixes)?
        };

        let Some(key) = matched else {
            return Ok(None);
        };

        let size_bytes = copy_tree(&self.entry_dir(&key), target).map_err(|e| {
            StepError::CacheEntryRestore {
                name: key.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Some(RestoredEntry { key, size_bytes }))
    }

    async fn save(&self, key: &str, base: &Path, paths: &[String]) -> StepResult<SavedEntry> {
        let entry_dir = self.entry_dir(key);

        // Replace any partial entry left behind by a crashed save
        if entry_dir.exists() {
            std::fs::remove_dir_all(&entry_dir).map_err(|e| StepError::CacheEntrySave {
                name: key.to_string(),
                reason: e.to_string(),
            })?;
        }

        let mut size_bytes = 0;
        for rel in paths {
            let source = base.join(rel);
            if !source.exists() {
                continue;
            }
            size_bytes += copy_tree(&source, &entry_dir.join(rel)).map_err(|e| {
                StepError::CacheEntrySave {
                    name: key.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(SavedEntry {
            key: key.to_string(),
            size_bytes,
        })
    }
}

/// Recursively copy a directory tree, returning the bytes copied
fn copy_tree(source: &Path, target: &Path) -> std::io::Result<u64> {
    if source.is_file() {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        return std::fs::copy(source, target);
    }

    std::fs::create_dir_all(target)?;
    let mut total = 0;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        total += copy_tree(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(total)
}
