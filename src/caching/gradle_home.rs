//! Gradle user home cache
//!
//! Splits the Gradle user home into independently restorable buckets and
//! keys each one by a content hash of the build's Gradle files. Same build
//! files = same key = exact hit; a changed build restores the newest
//! previous entry as a starting point.

use crate::caching::backend::CacheBackend;
use crate::caching::listener::CacheListener;
use crate::error::{StepError, StepResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One independently cached bucket of the Gradle user home
struct CacheEntryDefinition {
    /// Stable entry name used in keys and reports
    name: &'static str,
    /// Paths relative to the Gradle user home
    paths: &'static [&'static str],
}

const CACHE_ENTRIES: &[CacheEntryDefinition] = &[
    CacheEntryDefinition {
        name: "gradle-dependencies",
        paths: &["caches/modules-2"],
    },
    CacheEntryDefinition {
        name: "gradle-wrapper-dists",
        paths: &["wrapper/dists"],
    },
    CacheEntryDefinition {
        name: "gradle-build-cache",
        paths: &["caches/build-cache-1"],
    },
];

/// Gradle files under the build root that feed the cache key hash
const KEY_SOURCE_FILES: &[&str] = &[
    "settings.gradle",
    "settings.gradle.kts",
    "build.gradle",
    "build.gradle.kts",
    "gradle.properties",
    "gradle/wrapper/gradle-wrapper.properties",
];

/// Cache for the Gradle user home of one build root
pub struct GradleUserHomeCache {
    build_root: PathBuf,
    gradle_user_home: PathBuf,
    backend: Box<dyn CacheBackend>,
}

impl GradleUserHomeCache {
    /// Create the cache for a build root
    pub fn new(
        build_root: impl Into<PathBuf>,
        gradle_user_home: impl Into<PathBuf>,
        backend: Box<dyn CacheBackend>,
    ) -> Self {
        Self {
            build_root: build_root.into(),
            gradle_user_home: gradle_user_home.into(),
            backend,
        }
    }

    /// Ensure the Gradle user home directory exists
    pub fn init(&self) -> StepResult<()> {
        std::fs::create_dir_all(&self.gradle_user_home).map_err(|e| {
            StepError::io(
                format!(
                    "creating Gradle user home {}",
                    self.gradle_user_home.display()
                ),
                e,
            )
        })
    }

    /// Cache key for one entry: `<name>-v1-<os>-<hash12>`
    fn entry_key(&self, name: &str) -> StepResult<String> {
        Ok(format!(
            "{}-v1-{}-{}",
            name,
            std::env::consts::OS,
            self.build_files_hash()?
        ))
    }

    /// Key prefix matched by fallback restores
    fn entry_key_prefix(&self, name: &str) -> String {
        format!("{}-v1-{}-", name, std::env::consts::OS)
    }

    /// SHA-256 over the build's Gradle files, first 12 hex chars
    fn build_files_hash(&self) -> StepResult<String> {
        let mut hasher = Sha256::new();
        for rel in KEY_SOURCE_FILES {
            let path = self.build_root.join(rel);
            if !path.is_file() {
                continue;
            }
            let contents = std::fs::read(&path)
                .map_err(|e| StepError::io(format!("reading {}", path.display()), e))?;
            hasher.update(rel.as_bytes());
            hasher.update(&contents);
        }
        let digest = hasher.finalize();
        Ok(hex::encode(&digest[..6]))
    }

    /// Restore every entry, populating the listener
    ///
    /// A miss leaves the restored fields unset. Entry-level copy failures
    /// are logged and treated as misses; only storage-level errors escalate.
    pub async fn restore(&self, listener: &mut CacheListener) -> StepResult<()> {
        for def in CACHE_ENTRIES {
            let key = self.entry_key(def.name)?;
            let prefixes = vec![self.entry_key_prefix(def.name)];

            listener.entry(def.name).mark_requested(&key);

            match self
                .backend
                .restore(&key, &prefixes, &self.gradle_user_home)
                .await
            {
                Ok(Some(restored)) => {
                    info!(
                        "Restored {} from cache key {} ({} bytes)",
                        def.name, restored.key, restored.size_bytes
                    );
                    listener
                        .entry(def.name)
                        .mark_restored(restored.key, restored.size_bytes);
                }
                Ok(None) => {
                    debug!("Cache miss for {}", def.name);
                }
                Err(e @ StepError::CacheStoreUnavailable { .. }) => return Err(e),
                Err(e) => {
                    warn!("Failed to restore {}: {}", def.name, e);
                }
            }
        }
        Ok(())
    }

    /// Save every entry, populating the listener
    ///
    /// An entry restored from its exact key is unchanged in the store and
    /// is not saved again; its saved fields stay unset.
    pub async fn save(&self, listener: &mut CacheListener) -> StepResult<()> {
        for def in CACHE_ENTRIES {
            let key = self.entry_key(def.name)?;

            if listener.entry(def.name).is_exact_hit() {
                debug!("Cache hit occurred on {}, not saving", def.name);
                continue;
            }

            let paths: Vec<String> = def.paths.iter().map(|p| p.to_string()).collect();
            match self
                .backend
                .save(&key, &self.gradle_user_home, &paths)
                .await
            {
                Ok(saved) => {
                    info!(
                        "Saved {} to cache key {} ({} bytes)",
                        def.name, saved.key, saved.size_bytes
                    );
                    listener
                        .entry(def.name)
                        .mark_saved(saved.key, saved.size_bytes);
                }
                Err(e @ StepError::CacheStoreUnavailable { .. }) => return Err(e),
                Err(e) => {
                    warn!("Failed to save {}: {}", def.name, e);
                }
            }
        }
        Ok(())
    }
}
