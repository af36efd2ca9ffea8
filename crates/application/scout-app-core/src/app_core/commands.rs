use scout_core::JobId;

#[derive(Debug, Clone)]
pub enum SyncCommand {
    // Stream lifecycle
    Connect,
    Disconnect,

    // Job tracking
    SubscribeToJob(JobId),

    // Toasts
    DismissNotification(String),
    ClearNotifications,
}
