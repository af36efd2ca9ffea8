use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;

use scout_app_core::{SessionRepo, SyncKernel, SyncState};
use scout_core::NotificationKind;
use scout_infra::{FileSessionStore, InMemoryCacheTracker, PersistedSession, SseTransport, TermNotifier};

pub fn cmd_login(token: String, user: Option<String>) -> Result<()> {
    let store = FileSessionStore::new()?;
    store.save(&PersistedSession {
        access_token: token,
        user_id: user,
    })?;
    println!(":: Signed in");
    Ok(())
}

pub fn cmd_logout() -> Result<()> {
    let store = FileSessionStore::new()?;
    store.clear()?;
    println!(":: Signed out");
    Ok(())
}

pub fn cmd_status() -> Result<()> {
    let store = FileSessionStore::new()?;
    println!(":: Backend origin: {}", scout_config::backend_origin());
    match store.load()? {
        Some(session) => match session.user_id {
            Some(user) => println!(":: Signed in as {}", user),
            None => println!(":: Signed in"),
        },
        None => println!(":: Signed out"),
    }
    Ok(())
}

/// Connects to the event stream and prints connectivity transitions and
/// toasts until interrupted.
pub async fn cmd_watch(job: Option<String>) -> Result<()> {
    let origin = scout_config::backend_origin();
    let session = Arc::new(FileSessionStore::new()?);
    if session.current().is_none() {
        anyhow::bail!("not signed in; run `scout login` first");
    }

    let tracker = Arc::new(InMemoryCacheTracker::new());
    let mut kernel = SyncKernel::new(
        session,
        Arc::new(SseTransport::default()),
        tracker.clone(),
        Arc::new(TermNotifier::new()),
        origin.clone(),
    );

    let was_connected = Mutex::new(false);
    let printed = Mutex::new(HashSet::new());
    let _sub = kernel.store.subscribe(move |state| {
        if let Some(line) = connectivity_line(state, &mut was_connected.lock().unwrap()) {
            println!("{line}");
        }
        for line in new_toast_lines(state, &mut printed.lock().unwrap()) {
            println!("{line}");
        }
    });

    println!(":: Watching event stream at {}", origin);
    kernel.connect();

    if let Some(job_id) = job {
        // The subscription only goes out on an open stream.
        for _ in 0..50 {
            if kernel.is_connected() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        kernel.subscribe_to_job(job_id);
    }

    tokio::signal::ctrl_c().await?;
    kernel.disconnect();

    let stale = tracker.take_stale();
    if !stale.is_empty() {
        println!(":: {} cached queries went stale this session", stale.len());
    }
    Ok(())
}

fn connectivity_line(state: &SyncState, was_connected: &mut bool) -> Option<String> {
    if state.connected == *was_connected {
        return None;
    }
    *was_connected = state.connected;
    Some(if state.connected {
        ":: Stream connected".to_string()
    } else if state.reconnect_attempts > 0 {
        format!(
            ":: Stream lost (reconnect attempt {})",
            state.reconnect_attempts
        )
    } else {
        ":: Stream closed".to_string()
    })
}

/// Lines for toasts not yet printed. Newest-first in the snapshot; printed
/// in arrival order.
fn new_toast_lines(state: &SyncState, printed: &mut HashSet<String>) -> Vec<String> {
    state
        .notifications
        .iter()
        .rev()
        .filter(|n| printed.insert(n.id.clone()))
        .map(|n| {
            let tag = match n.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Info => "info",
            };
            format!("[{}] {}: {}", tag, n.title, n.body)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scout_core::Notification;

    fn toast(id: &str, kind: NotificationKind) -> Notification {
        Notification {
            id: id.to_string(),
            kind,
            title: "Job completed".into(),
            body: id.to_string(),
            target: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn toasts_print_once_in_arrival_order() {
        let mut state = SyncState::default();
        // Snapshot holds newest first.
        state.notifications = vec![
            toast("b", NotificationKind::Info),
            toast("a", NotificationKind::Success),
        ];

        let mut printed = HashSet::new();
        let lines = new_toast_lines(&state, &mut printed);
        assert_eq!(lines, vec!["[ok] Job completed: a", "[info] Job completed: b"]);

        // A later snapshot only yields what is new.
        assert!(new_toast_lines(&state, &mut printed).is_empty());
        state
            .notifications
            .insert(0, toast("c", NotificationKind::Success));
        assert_eq!(
            new_toast_lines(&state, &mut printed),
            vec!["[ok] Job completed: c"]
        );
    }

    #[test]
    fn connectivity_lines_only_on_transitions() {
        let mut state = SyncState::default();
        let mut was_connected = false;

        assert!(connectivity_line(&state, &mut was_connected).is_none());

        state.connected = true;
        assert_eq!(
            connectivity_line(&state, &mut was_connected).as_deref(),
            Some(":: Stream connected")
        );
        assert!(connectivity_line(&state, &mut was_connected).is_none());

        state.connected = false;
        state.reconnect_attempts = 2;
        assert_eq!(
            connectivity_line(&state, &mut was_connected).as_deref(),
            Some(":: Stream lost (reconnect attempt 2)")
        );
    }
}
