use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use scout_app_core::CacheInvalidator;
use scout_core::CacheKey;

/// Tracks which cached reads have been invalidated by stream events, for
/// consumers that poll rather than subscribe. Marking is idempotent; taking
/// the set resets it.
#[derive(Default)]
pub struct InMemoryCacheTracker {
    stale: Mutex<HashSet<CacheKey>>,
}

impl InMemoryCacheTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.stale.lock().unwrap().contains(key)
    }

    /// Drains and returns everything currently stale.
    pub fn take_stale(&self) -> Vec<CacheKey> {
        self.stale.lock().unwrap().drain().collect()
    }
}

impl CacheInvalidator for InMemoryCacheTracker {
    fn mark_stale(&self, key: &CacheKey) {
        if self.stale.lock().unwrap().insert(key.clone()) {
            debug!(?key, "cache key marked stale");
        }
    }
}
