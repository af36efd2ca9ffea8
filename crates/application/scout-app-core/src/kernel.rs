use std::sync::Arc;

use tracing::debug;

use scout_core::JobId;

use crate::app_core::{SyncCommand, SyncEvent, SyncStore};
use crate::connection::ConnectionSupervisor;
use crate::notifier::NotificationDispatcher;
use crate::ports::{CacheInvalidator, DesktopNotifyPort, EventTransport, SessionRepo};

/// Wires the store, connection supervisor, cache bridge, and notification
/// dispatcher together behind the handful of actions consumers may take.
/// Constructed once per application root and passed by reference; there is
/// no ambient singleton.
pub struct SyncKernel {
    pub store: SyncStore,
    session: Arc<dyn SessionRepo>,
    supervisor: ConnectionSupervisor,
    /// Credential the current supervision loop was started with.
    last_token: Option<String>,
}

impl SyncKernel {
    pub fn new(
        session: Arc<dyn SessionRepo>,
        transport: Arc<dyn EventTransport>,
        invalidator: Arc<dyn CacheInvalidator>,
        desktop: Arc<dyn DesktopNotifyPort>,
        origin: String,
    ) -> Self {
        let store = SyncStore::default();
        let dispatcher = Arc::new(NotificationDispatcher::new(store.clone(), desktop));
        let supervisor =
            ConnectionSupervisor::new(store.clone(), transport, invalidator, dispatcher, origin);

        Self {
            store,
            session,
            supervisor,
            last_token: None,
        }
    }

    pub fn handle(&mut self, cmd: SyncCommand) {
        match cmd {
            SyncCommand::Connect => self.connect(),
            SyncCommand::Disconnect => self.disconnect(),
            SyncCommand::SubscribeToJob(job_id) => self.subscribe_to_job(job_id),
            SyncCommand::DismissNotification(id) => self.dismiss_notification(&id),
            SyncCommand::ClearNotifications => self.clear_notifications(),
        }
    }

    /// Opens the event stream for the current session. No-op while already
    /// connected or while a retry loop for the same credential is alive;
    /// silently abandoned when no session exists. Never fails to callers.
    pub fn connect(&mut self) {
        let Some(identity) = self.session.current() else {
            debug!("no authenticated session; skipping stream connect");
            return;
        };

        if self.supervisor.is_running() {
            if self.store.state().connected {
                // Idempotent: one open transport at a time. A credential
                // change is picked up on the next reconnect, not mid-stream.
                return;
            }
            if self.last_token.as_deref() == Some(identity.access_token.as_str()) {
                // Retry loop already working on this credential.
                return;
            }
            // Identity changed while down: tear down and re-establish.
            self.supervisor.stop();
            self.store.apply(SyncEvent::StreamClosed);
        }

        self.last_token = Some(identity.access_token.clone());
        self.supervisor.start(identity.access_token);
    }

    /// Tears down the stream. Connectivity drops to false immediately and no
    /// further events are folded, even ones already in flight.
    pub fn disconnect(&mut self) {
        self.supervisor.stop();
        self.store.apply(SyncEvent::StreamClosed);
    }

    pub fn subscribe_to_job(&self, job_id: JobId) {
        self.supervisor.subscribe_to_job(job_id);
    }

    pub fn dismiss_notification(&self, id: &str) {
        self.store
            .apply(SyncEvent::NotificationDismissed(id.to_string()));
    }

    pub fn clear_notifications(&self) {
        self.store.apply(SyncEvent::NotificationsCleared);
    }

    pub fn is_connected(&self) -> bool {
        self.store.state().connected
    }
}
