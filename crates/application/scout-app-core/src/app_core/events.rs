use scout_core::{
    ConnectionStatus, CreditsUpdate, DiscoveryResult, JobCompleted, JobUpdate, Notification,
};

#[derive(Debug, Clone)]
pub enum SyncEvent {
    // Stream lifecycle
    StreamOpened,
    /// The stream dropped or an open attempt failed; `attempts` is the
    /// consecutive-failure count since it was last open.
    StreamLost { attempts: u32 },
    /// Deliberate teardown: `disconnect()` or a server-initiated close.
    StreamClosed,

    // Server events, one per inbound category
    ConnectionStatusChanged(ConnectionStatus),
    JobUpdated(JobUpdate),
    JobCompleted(JobCompleted),
    CreditsUpdated(CreditsUpdate),
    DiscoveryResultsReceived(DiscoveryResult),

    // Toast lifecycle
    NotificationPushed(Notification),
    NotificationDismissed(String),
    NotificationsCleared,
}
