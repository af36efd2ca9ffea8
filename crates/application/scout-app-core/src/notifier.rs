use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use scout_core::{
    notification::notification_id, CreditsChangeKind, Notification, NotificationKind, TargetView,
};

use crate::app_core::{SyncEvent, SyncStore};
use crate::ports::{DesktopNotifyPort, NotifyPermission};

/// Turns freshly folded events into user-visible toasts and desktop
/// notifications. Old events (outside the recency window) and events already
/// announced this session are skipped.
pub struct NotificationDispatcher {
    store: SyncStore,
    desktop: Arc<dyn DesktopNotifyPort>,
    /// De-duplication keys announced this tab session, including dismissed
    /// ones so a dismissed toast never resurfaces.
    seen: Mutex<HashSet<String>>,
    permission_requested: AtomicBool,
}

impl NotificationDispatcher {
    pub fn new(store: SyncStore, desktop: Arc<dyn DesktopNotifyPort>) -> Self {
        Self {
            store,
            desktop,
            seen: Mutex::new(HashSet::new()),
            permission_requested: AtomicBool::new(false),
        }
    }

    /// Opportunistic one-time permission request, the first time a session
    /// has a live stream. An explicit prior denial is never re-prompted.
    pub fn on_session_active(&self) {
        if self.permission_requested.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.desktop.permission() == NotifyPermission::Default {
            let resolved = self.desktop.request_permission();
            debug!(?resolved, "desktop notification permission resolved");
        }
    }

    /// Inspects one folded event and announces it if it warrants a toast.
    pub fn observe(&self, ev: &SyncEvent) {
        match ev {
            SyncEvent::JobCompleted(rec) => {
                let body = if rec.message.is_empty() {
                    match rec.total_items {
                        Some(n) => format!("Processed {n} items"),
                        None => "Job finished".to_string(),
                    }
                } else {
                    rec.message.clone()
                };
                self.push(
                    "job",
                    &rec.job_id,
                    rec.timestamp,
                    NotificationKind::Success,
                    "Job completed",
                    body,
                    Some(TargetView::for_job_type(&rec.job_type)),
                );
            }

            SyncEvent::CreditsUpdated(rec) => match rec.kind {
                CreditsChangeKind::Purchase => self.push(
                    "credits",
                    "purchase",
                    rec.timestamp,
                    NotificationKind::Success,
                    "Credits added",
                    format!("+{} credits", rec.amount),
                    None,
                ),
                CreditsChangeKind::Usage if rec.amount < 0 => self.push(
                    "credits",
                    "usage",
                    rec.timestamp,
                    NotificationKind::Info,
                    "Credits used",
                    format!("{} credits used", rec.amount.abs()),
                    None,
                ),
                _ => {}
            },

            SyncEvent::DiscoveryResultsReceived(rec) => {
                let source = rec.job_id.as_deref().unwrap_or("batch");
                self.push(
                    "discovery",
                    source,
                    rec.timestamp,
                    NotificationKind::Success,
                    "Discovery complete",
                    format!(
                        "Found {} channels via {}",
                        rec.channel_count, rec.discovery_method
                    ),
                    Some(TargetView::ChannelList),
                );
            }

            _ => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &self,
        category: &str,
        source_id: &str,
        timestamp: Option<DateTime<Utc>>,
        kind: NotificationKind,
        title: &str,
        body: String,
        target: Option<TargetView>,
    ) {
        let shown_at = timestamp.unwrap_or_else(Utc::now);
        let age = Utc::now().signed_duration_since(shown_at);
        if age.num_seconds() > scout_config::TOAST_RECENCY_WINDOW_SECS {
            // Replayed history, not news.
            return;
        }

        let id = notification_id(category, source_id, timestamp);
        if !self.seen.lock().unwrap().insert(id.clone()) {
            return;
        }

        if self.desktop.permission() == NotifyPermission::Granted {
            self.desktop.show(title, &body);
        }

        self.store.apply(SyncEvent::NotificationPushed(Notification {
            id,
            kind,
            title: title.to_string(),
            body,
            target,
            timestamp: shown_at,
        }));
    }
}
