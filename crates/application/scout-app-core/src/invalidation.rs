use scout_core::CacheKey;

use crate::app_core::SyncEvent;
use crate::ports::CacheInvalidator;

/// Which cached reads an event makes stale. Lifecycle and toast events touch
/// no caches.
pub fn stale_keys(ev: &SyncEvent) -> Vec<CacheKey> {
    match ev {
        SyncEvent::JobUpdated(update) => vec![
            CacheKey::JobList,
            CacheKey::JobStatus(update.job_id.clone()),
        ],
        SyncEvent::JobCompleted(_) => vec![
            CacheKey::JobList,
            CacheKey::ChannelList,
            CacheKey::DashboardStats,
            CacheKey::DiscoveryResultsList,
        ],
        SyncEvent::CreditsUpdated(_) => vec![CacheKey::CurrentUser, CacheKey::DashboardStats],
        SyncEvent::DiscoveryResultsReceived(_) => vec![
            CacheKey::ChannelList,
            CacheKey::DashboardStats,
            CacheKey::DiscoveryResultsList,
        ],
        _ => Vec::new(),
    }
}

/// Fire-and-forget staleness marking for a freshly folded event.
pub fn invalidate_for(invalidator: &dyn CacheInvalidator, ev: &SyncEvent) {
    for key in stale_keys(ev) {
        invalidator.mark_stale(&key);
    }
}
