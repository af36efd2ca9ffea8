//! Central configuration constants for runtime limits and defaults.

use std::time::Duration;

/// How many per-job snapshots the job-update history retains.
pub const JOB_HISTORY_CAP: usize = 20;

/// Capacity of the completed-jobs history (newest first).
pub const COMPLETED_HISTORY_CAP: usize = 10;

/// Capacity of the credits-event history (newest first).
pub const CREDITS_HISTORY_CAP: usize = 10;

/// Capacity of the discovery-results history (newest first).
pub const DISCOVERY_HISTORY_CAP: usize = 10;

/// Fixed delay between automatic reconnection attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Consecutive failed attempts before the stream settles disconnected.
pub const RECONNECT_MAX_ATTEMPTS: u32 = 5;

/// A connection attempt that has not reached "open" by this deadline is
/// forcibly aborted.
pub const OPEN_WATCHDOG: Duration = Duration::from_secs(30);

/// Only events younger than this are eligible for a toast; older ones are
/// history being replayed, not news.
pub const TOAST_RECENCY_WINDOW_SECS: i64 = 5;

/// Environment variable overriding the backend origin.
pub const ORIGIN_ENV_VAR: &str = "SCOUT_API_ORIGIN";

pub const PRODUCTION_ORIGIN: &str = "https://api.scoutintel.io";
pub const LOCAL_ORIGIN: &str = "http://localhost:8000";

/// Backend origin for this deployment: env override first, then the
/// build-profile default (local origin for debug builds).
pub fn backend_origin() -> String {
    if let Ok(origin) = std::env::var(ORIGIN_ENV_VAR) {
        let origin = origin.trim().trim_end_matches('/').to_string();
        if !origin.is_empty() {
            return origin;
        }
    }
    if cfg!(debug_assertions) {
        LOCAL_ORIGIN.to_string()
    } else {
        PRODUCTION_ORIGIN.to_string()
    }
}
