use serde::{Deserialize, Serialize};

use crate::JobId;

/// Client-side data-cache keys that stream events can mark stale. The
/// underlying cache technology is the consumer's concern; this enum is the
/// portable contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    JobList,
    JobStatus(JobId),
    ChannelList,
    DashboardStats,
    DiscoveryResultsList,
    CurrentUser,
}
