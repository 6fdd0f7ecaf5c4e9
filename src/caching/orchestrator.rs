//! Cache restore/save policy
//!
//! The restore phase runs inside `gradle-step run`, the save phase inside
//! `gradle-step save` — a different OS process. Everything the save phase
//! needs is persisted through the [`StateStore`].

use crate::caching::backend::DirectoryCacheBackend;
use crate::caching::gradle_home::GradleUserHomeCache;
use crate::caching::listener::CacheListener;
use crate::caching::report::log_caching_report;
use crate::config::CacheSettings;
use crate::error::StepResult;
use crate::invoke::resolve::resolve_gradle_user_home;
use crate::state::{StateStore, BUILD_ROOT_DIR, CACHE_LISTENER};
use crate::ui;
use std::path::Path;
use tracing::{debug, info};

fn open_cache(build_root: &Path, settings: &CacheSettings) -> StepResult<GradleUserHomeCache> {
    let root = settings
        .directory
        .clone()
        .unwrap_or_else(DirectoryCacheBackend::default_root);
    let backend = Box::new(DirectoryCacheBackend::open(root)?);
    let gradle_user_home = resolve_gradle_user_home(build_root);
    Ok(GradleUserHomeCache::new(build_root, gradle_user_home, backend))
}

/// Restore the Gradle user home from cache and persist the listener
pub async fn restore(
    build_root: &Path,
    settings: &CacheSettings,
    store: &StateStore,
) -> StepResult<()> {
    if settings.disabled {
        info!("Cache is disabled: will not restore state from previous builds.");
        return Ok(());
    }

    let cache = open_cache(build_root, settings)?;
    cache.init()?;

    ui::group_start("Restore Gradle state from cache");
    let result = restore_entries(&cache, build_root, store).await;
    ui::group_end();
    result
}

async fn restore_entries(
    cache: &GradleUserHomeCache,
    build_root: &Path,
    store: &StateStore,
) -> StepResult<()> {
    store
        .set(BUILD_ROOT_DIR, &build_root.to_string_lossy())
        .await?;

    let mut listener = CacheListener::new();
    cache.restore(&mut listener).await?;

    store.set(CACHE_LISTENER, &listener.stringify()?).await
}

/// Save the Gradle user home to cache and report on the whole step
pub async fn save(settings: &CacheSettings, store: &StateStore) -> StepResult<()> {
    let state = store.get(CACHE_LISTENER).await?;
    let mut listener = CacheListener::rehydrate(state.as_deref())?;

    if settings.read_only {
        info!("Cache is read-only: will not save state for use in subsequent builds.");
        log_caching_report(&listener);
        return Ok(());
    }

    ui::group_start("Caching Gradle state");
    let result = save_entries(settings, store, &mut listener).await;
    ui::group_end();

    log_caching_report(&listener);
    result
}

async fn save_entries(
    settings: &CacheSettings,
    store: &StateStore,
    listener: &mut CacheListener,
) -> StepResult<()> {
    match store.get(BUILD_ROOT_DIR).await? {
        Some(build_root) => {
            let cache = open_cache(Path::new(&build_root), settings)?;
            cache.save(listener).await
        }
        None => {
            // Restore phase never ran (crashed or skipped); nothing to save
            debug!("No build root persisted; skipping cache save");
            Ok(())
        }
    }
}
