use async_trait::async_trait;

use scout_core::{CacheKey, OutboundEvent, ServerEvent};

/// Credential snapshot read at connect time. The token is not refreshed
/// mid-connection; a change triggers a full reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub access_token: String,
    pub user_id: Option<String>,
}

pub trait SessionRepo: Send + Sync + 'static {
    /// The persisted session, if any. `None` is the signed-out steady state.
    fn current(&self) -> Option<SessionIdentity>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPermission {
    Granted,
    Denied,
    /// Undetermined: the user has never been asked.
    Default,
}

/// OS-level notification capability. Browser and native hosts supply their
/// own implementation; headless targets can supply a no-op.
pub trait DesktopNotifyPort: Send + Sync + 'static {
    fn permission(&self) -> NotifyPermission;
    fn request_permission(&self) -> NotifyPermission;
    fn show(&self, title: &str, body: &str);
}

/// Marks a data-cache key as no-longer-authoritative. Must be idempotent;
/// the re-fetch itself is each consumer's responsibility.
pub trait CacheInvalidator: Send + Sync + 'static {
    fn mark_stale(&self, key: &CacheKey);
}

/// Why an open stream stopped yielding events.
#[derive(Debug, thiserror::Error)]
pub enum StreamEnd {
    /// Explicit server-initiated close. No automatic reconnection.
    #[error("server closed the stream")]
    ServerClose,
    /// Transport failure; the supervisor may retry.
    #[error("stream lost: {0}")]
    Lost(String),
}

/// One live, authenticated event stream.
#[async_trait]
pub trait EventStream: Send {
    /// Next inbound event, or the reason the stream ended.
    async fn recv(&mut self) -> Result<ServerEvent, StreamEnd>;

    /// Delivers a client-to-backend event. Only called while open.
    async fn send(&mut self, event: OutboundEvent) -> anyhow::Result<()>;
}

/// Opens authenticated event streams against a backend origin.
#[async_trait]
pub trait EventTransport: Send + Sync + 'static {
    async fn open(
        &self,
        origin: &str,
        access_token: &str,
    ) -> anyhow::Result<Box<dyn EventStream>>;
}
