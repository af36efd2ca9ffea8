use crate::domain::SyncState;

use super::events::SyncEvent;

pub fn reduce(mut state: SyncState, ev: SyncEvent) -> SyncState {
    match ev {
        SyncEvent::StreamOpened => {
            state.connected = true;
            state.reconnect_attempts = 0;
        }

        SyncEvent::StreamLost { attempts } => {
            state.connected = false;
            state.reconnect_attempts = attempts;
        }

        SyncEvent::StreamClosed => {
            state.connected = false;
            state.connection_status = None;
        }

        SyncEvent::ConnectionStatusChanged(status) => {
            state.connection_status = Some(status);
        }

        SyncEvent::JobUpdated(update) => {
            let id = update.job_id.clone();
            state
                .job_updates
                .replace_or_append(update, |existing| existing.job_id == id);
        }

        SyncEvent::JobCompleted(record) => state.completed_jobs.push_front(record),

        SyncEvent::CreditsUpdated(record) => state.credits_events.push_front(record),

        SyncEvent::DiscoveryResultsReceived(record) => state.discovery_results.push_front(record),

        SyncEvent::NotificationPushed(n) => {
            if !state.notifications.iter().any(|existing| existing.id == n.id) {
                state.notifications.insert(0, n);
            }
        }

        SyncEvent::NotificationDismissed(id) => {
            state.notifications.retain(|n| n.id != id);
        }

        SyncEvent::NotificationsCleared => state.notifications.clear(),
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scout_core::{JobStatus, JobUpdate, Notification, NotificationKind};

    fn job_update(id: &str, progress: u8) -> JobUpdate {
        JobUpdate {
            job_id: id.to_string(),
            job_type: "channel_discovery_batch".to_string(),
            status: JobStatus::Running,
            progress: Some(progress),
            message: None,
            error: None,
            timestamp: Some(Utc::now()),
        }
    }

    #[test]
    fn repeated_job_updates_keep_one_entry_per_identifier() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::JobUpdated(job_update("J1", 40)));
        state = reduce(state, SyncEvent::JobUpdated(job_update("J1", 70)));

        assert_eq!(state.job_updates.len(), 1);
        assert_eq!(state.job_updates.items()[0].progress, Some(70));
    }

    #[test]
    fn non_monotonic_progress_is_last_write_wins() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::JobUpdated(job_update("J1", 70)));
        state = reduce(state, SyncEvent::JobUpdated(job_update("J1", 40)));

        assert_eq!(state.job_updates.items()[0].progress, Some(40));
    }

    #[test]
    fn job_history_evicts_oldest_past_capacity() {
        let mut state = SyncState::default();
        for n in 0..25 {
            state = reduce(state, SyncEvent::JobUpdated(job_update(&format!("J{n}"), 1)));
        }

        assert_eq!(state.job_updates.len(), scout_config::JOB_HISTORY_CAP);
        // Oldest dropped first: J0..J4 are gone, the most recent survive.
        assert!(!state.job_updates.iter().any(|u| u.job_id == "J0"));
        assert!(state.job_updates.iter().any(|u| u.job_id == "J24"));
    }

    #[test]
    fn completed_jobs_are_newest_first_and_capped() {
        let mut state = SyncState::default();
        for n in 0..12 {
            state = reduce(
                state,
                SyncEvent::JobCompleted(scout_core::JobCompleted {
                    job_id: format!("J{n}"),
                    job_type: String::new(),
                    total_items: None,
                    message: String::new(),
                    timestamp: None,
                }),
            );
        }

        assert_eq!(state.completed_jobs.len(), scout_config::COMPLETED_HISTORY_CAP);
        assert_eq!(state.completed_jobs.items()[0].job_id, "J11");
    }

    #[test]
    fn stream_closed_clears_last_known_status() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::StreamOpened);
        state = reduce(
            state,
            SyncEvent::ConnectionStatusChanged(scout_core::ConnectionStatus {
                status: scout_core::StreamStatus::Connected,
                user_id: Some("u-1".into()),
                timestamp: None,
            }),
        );
        state = reduce(state, SyncEvent::StreamClosed);

        assert!(!state.connected);
        assert!(state.connection_status.is_none());
    }

    #[test]
    fn stream_open_resets_the_attempt_counter() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::StreamLost { attempts: 3 });
        assert_eq!(state.reconnect_attempts, 3);
        assert!(!state.connected);

        state = reduce(state, SyncEvent::StreamOpened);
        assert_eq!(state.reconnect_attempts, 0);
        assert!(state.connected);
    }

    fn toast(id: &str) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Success,
            title: "t".into(),
            body: "b".into(),
            target: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn duplicate_notification_ids_are_not_inserted_twice() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::NotificationPushed(toast("job:J1:5")));
        state = reduce(state, SyncEvent::NotificationPushed(toast("job:J1:5")));
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn dismiss_and_clear_remove_toasts_without_touching_histories() {
        let mut state = SyncState::default();
        state = reduce(state, SyncEvent::JobUpdated(job_update("J1", 10)));
        state = reduce(state, SyncEvent::NotificationPushed(toast("a")));
        state = reduce(state, SyncEvent::NotificationPushed(toast("b")));

        state = reduce(state, SyncEvent::NotificationDismissed("a".into()));
        assert_eq!(state.notifications.len(), 1);

        state = reduce(state, SyncEvent::NotificationsCleared);
        assert!(state.notifications.is_empty());
        assert_eq!(state.job_updates.len(), 1);
    }
}
