use scout_core::{
    BoundedHistory, ConnectionStatus, CreditsUpdate, DiscoveryResult, JobCompleted, JobUpdate,
    Notification,
};

/// Everything consumers can observe about the sync layer. Mutated only by
/// the reducer; exposed as cloned snapshots through the store.
#[derive(Debug, Clone)]
pub struct SyncState {
    /// Transport-level connectivity flag.
    pub connected: bool,
    /// Consecutive failed connection attempts since the stream was last open.
    pub reconnect_attempts: u32,
    /// Last status event the backend pushed (distinct from `connected`).
    pub connection_status: Option<ConnectionStatus>,

    /// One entry per job identifier, most recent snapshot wins.
    pub job_updates: BoundedHistory<JobUpdate>,
    pub completed_jobs: BoundedHistory<JobCompleted>,
    pub credits_events: BoundedHistory<CreditsUpdate>,
    pub discovery_results: BoundedHistory<DiscoveryResult>,

    /// Derived, dismissible toasts. Managed by the notification dispatcher.
    pub notifications: Vec<Notification>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            connected: false,
            reconnect_attempts: 0,
            connection_status: None,
            job_updates: BoundedHistory::new(scout_config::JOB_HISTORY_CAP),
            completed_jobs: BoundedHistory::new(scout_config::COMPLETED_HISTORY_CAP),
            credits_events: BoundedHistory::new(scout_config::CREDITS_HISTORY_CAP),
            discovery_results: BoundedHistory::new(scout_config::DISCOVERY_HISTORY_CAP),
            notifications: Vec::new(),
        }
    }
}
