use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Info,
}

/// Where a notification's action takes the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetView {
    ChannelList,
    Analytics,
    JobList,
}

impl TargetView {
    /// Classifies a free-form job type by substring. First match wins;
    /// anything unrecognized lands on the job list.
    pub fn for_job_type(job_type: &str) -> TargetView {
        if job_type.contains("discovery") {
            TargetView::ChannelList
        } else if job_type.contains("metadata") {
            TargetView::Analytics
        } else {
            TargetView::JobList
        }
    }
}

/// Ephemeral, dismissible, user-visible record derived from a stream event.
/// Never persisted; lives until dismissed or cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Where clicking the notification navigates, when it has a destination.
    pub target: Option<TargetView>,
    pub timestamp: DateTime<Utc>,
}

/// De-duplication identity: category + source identifier + event timestamp.
/// Folding the same wire event twice yields the same id.
pub fn notification_id(
    category: &str,
    source_id: &str,
    timestamp: Option<DateTime<Utc>>,
) -> String {
    let millis = timestamp.map(|t| t.timestamp_millis()).unwrap_or(0);
    format!("{category}:{source_id}:{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_classification_first_match_wins() {
        assert_eq!(
            TargetView::for_job_type("channel_discovery_batch"),
            TargetView::ChannelList
        );
        assert_eq!(
            TargetView::for_job_type("metadata_refresh"),
            TargetView::Analytics
        );
        // "discovery" is checked before "metadata"
        assert_eq!(
            TargetView::for_job_type("discovery_metadata"),
            TargetView::ChannelList
        );
        assert_eq!(TargetView::for_job_type("export"), TargetView::JobList);
    }

    #[test]
    fn identical_events_share_a_notification_id() {
        let ts = Some(Utc::now());
        assert_eq!(
            notification_id("job", "J1", ts),
            notification_id("job", "J1", ts)
        );
        assert_ne!(
            notification_id("job", "J1", ts),
            notification_id("credits", "J1", ts)
        );
    }
}
