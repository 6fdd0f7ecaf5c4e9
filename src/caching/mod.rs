//! Gradle user home caching
//!
//! Decides when and what to cache and how to report on it. The byte-level
//! storage mechanism lives behind the [`backend::CacheBackend`] trait; this
//! module owns the policy:
//!
//! - restore runs first, records what was found in a [`listener::CacheListener`],
//!   and persists it across the process boundary
//! - save runs last in a separate process, rehydrates the listener, writes
//!   mutated state back unless read-only, and always reports
//!
//! A cache miss is routine, never an error. Only unreachable storage
//! escalates to the phase boundary.

pub mod backend;
pub mod gradle_home;
pub mod listener;
pub mod orchestrator;
pub mod report;

pub use backend::{CacheBackend, DirectoryCacheBackend, RestoredEntry, SavedEntry};
pub use gradle_home::GradleUserHomeCache;
pub use listener::{CacheEntryListener, CacheListener};
