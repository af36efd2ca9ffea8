use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod history;
pub mod notification;

pub use cache::CacheKey;
pub use history::BoundedHistory;
pub use notification::{Notification, NotificationKind, TargetView};

pub type JobId = String;

/// Lifecycle states a background job reports over the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

/// Point-in-time snapshot of a background job. Later snapshots for the same
/// `job_id` supersede earlier ones; only `job_id` is required on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobUpdate {
    pub job_id: JobId,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Terminal job notification. Distinct from a `JobUpdate` carrying
/// `Completed`: this one holds the summary fields the toast layer shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobCompleted {
    pub job_id: JobId,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreditsChangeKind {
    Purchase,
    Usage,
    PurchasePending,
    /// Anything the backend adds later. Recorded but never announced.
    #[default]
    #[serde(other)]
    Other,
}

/// A balance-changing credits event. `amount` is signed: purchases are
/// positive, usage is negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditsUpdate {
    #[serde(rename = "type", default)]
    pub kind: CreditsChangeKind,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub new_balance: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Summary of a completed discovery batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryResult {
    #[serde(default)]
    pub channel_count: u64,
    #[serde(default)]
    pub discovery_method: String,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Connected,
    #[default]
    Disconnected,
    Reconnecting,
}

/// Last status event the backend pushed over the stream. Distinct from the
/// transport-level connectivity flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub status: StreamStatus,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A named inbound event as it arrives off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    ConnectionStatus(ConnectionStatus),
    JobUpdate(JobUpdate),
    JobCompleted(JobCompleted),
    CreditsUpdated(CreditsUpdate),
    DiscoveryResults(DiscoveryResult),
    /// Implementation-defined backend error payload. Logged only.
    Error(serde_json::Value),
}

impl ServerEvent {
    /// Decodes a named event. Returns `None` for unknown event names or for
    /// payloads missing the one identifier de-duplication needs; every other
    /// field is optional and defaults on absence.
    pub fn parse(name: &str, data: &str) -> Option<ServerEvent> {
        match name {
            "connection_status" => serde_json::from_str(data)
                .ok()
                .map(ServerEvent::ConnectionStatus),
            "job_update" => serde_json::from_str(data).ok().map(ServerEvent::JobUpdate),
            "job_completed" => serde_json::from_str(data)
                .ok()
                .map(ServerEvent::JobCompleted),
            "credits_updated" => serde_json::from_str(data)
                .ok()
                .map(ServerEvent::CreditsUpdated),
            "discovery_results" => serde_json::from_str(data)
                .ok()
                .map(ServerEvent::DiscoveryResults),
            "error" => Some(ServerEvent::Error(
                serde_json::from_str(data).unwrap_or(serde_json::Value::Null),
            )),
            _ => None,
        }
    }
}

/// Client-to-backend events. Only sent while the stream is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundEvent {
    SubscribeToJob { job_id: JobId },
}
