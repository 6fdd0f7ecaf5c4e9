//! Cache entry metrics carried across the process boundary
//!
//! The listener is the only vehicle carrying restore-phase knowledge into
//! the save phase, so it serializes losslessly to a single string. Absent
//! fields mean "never happened" and are distinct from zero.

use crate::error::{StepError, StepResult};
use serde::{Deserialize, Serialize};

/// Metrics for one named cache entry
///
/// `restored_key` is only ever set after `requested_key`; size fields are
/// only meaningful alongside their key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryListener {
    /// Stable identifier of the entry
    pub entry_name: String,

    /// Key the restore asked for
    pub requested_key: Option<String>,

    /// Key that actually matched (may differ under fallback matches)
    pub restored_key: Option<String>,

    /// Bytes restored; absent when no restore occurred
    pub restored_size: Option<u64>,

    /// Key the entry was saved under
    pub saved_key: Option<String>,

    /// Bytes saved; absent when no save occurred
    pub saved_size: Option<u64>,
}

impl CacheEntryListener {
    fn new(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            requested_key: None,
            restored_key: None,
            restored_size: None,
            saved_key: None,
            saved_size: None,
        }
    }

    /// Record the key the restore asked for
    pub fn mark_requested(&mut self, key: impl Into<String>) -> &mut Self {
        self.requested_key = Some(key.into());
        self
    }

    /// Record a restore hit
    pub fn mark_restored(&mut self, key: impl Into<String>, size: u64) -> &mut Self {
        self.restored_key = Some(key.into());
        self.restored_size = Some(size);
        self
    }

    /// Record a save
    pub fn mark_saved(&mut self, key: impl Into<String>, size: u64) -> &mut Self {
        self.saved_key = Some(key.into());
        self.saved_size = Some(size);
        self
    }

    /// Whether the restore hit the exact key it asked for
    pub fn is_exact_hit(&self) -> bool {
        self.requested_key.is_some() && self.restored_key == self.requested_key
    }
}

/// Ordered collection of cache entry metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheListener {
    /// Entries in insertion order (preserved for reporting)
    pub cache_entries: Vec<CacheEntryListener>,
}

impl CacheListener {
    /// Create an empty listener
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or insert the entry with the given name
    pub fn entry(&mut self, name: &str) -> &mut CacheEntryListener {
        let index = match self.cache_entries.iter().position(|e| e.entry_name == name) {
            Some(i) => i,
            None => {
                self.cache_entries.push(CacheEntryListener::new(name));
                self.cache_entries.len() - 1
            }
        };
        &mut self.cache_entries[index]
    }

    /// Serialize to the single-string form persisted across phases
    pub fn stringify(&self) -> StepResult<String> {
        serde_json::to_string(self).map_err(StepError::Json)
    }

    /// Reconstruct from the persisted string
    ///
    /// An absent or empty string yields an empty listener; the save phase
    /// must tolerate the restore phase never having run.
    pub fn rehydrate(state: Option<&str>) -> StepResult<Self> {
        match state {
            None => Ok(Self::default()),
            Some(s) if s.trim().is_empty() => Ok(Self::default()),
            Some(s) => serde_json::from_str(s).map_err(StepError::ListenerCorrupt),
        }
    }
}
