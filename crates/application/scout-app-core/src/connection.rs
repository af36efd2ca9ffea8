use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use scout_core::{JobId, OutboundEvent, ServerEvent};

use crate::app_core::{SyncEvent, SyncStore};
use crate::invalidation::invalidate_for;
use crate::notifier::NotificationDispatcher;
use crate::ports::{CacheInvalidator, EventStream, EventTransport, StreamEnd};

/// Owns the lifetime of the single event-stream connection: open, pump,
/// reconnect with a fixed delay up to the attempt limit, tear down on
/// cancellation. Stream failures never propagate past this type; they only
/// move the connectivity flag.
pub struct ConnectionSupervisor {
    store: SyncStore,
    transport: Arc<dyn EventTransport>,
    invalidator: Arc<dyn CacheInvalidator>,
    dispatcher: Arc<NotificationDispatcher>,
    origin: String,

    cancel: Option<CancellationToken>,
    done: Option<Arc<AtomicBool>>,
    outbound: Option<mpsc::Sender<OutboundEvent>>,
}

impl ConnectionSupervisor {
    pub fn new(
        store: SyncStore,
        transport: Arc<dyn EventTransport>,
        invalidator: Arc<dyn CacheInvalidator>,
        dispatcher: Arc<NotificationDispatcher>,
        origin: String,
    ) -> Self {
        Self {
            store,
            transport,
            invalidator,
            dispatcher,
            origin,
            cancel: None,
            done: None,
            outbound: None,
        }
    }

    /// Whether a supervision loop is alive (open, or still retrying).
    pub fn is_running(&self) -> bool {
        match (&self.cancel, &self.done) {
            (Some(cancel), Some(done)) => {
                !cancel.is_cancelled() && !done.load(Ordering::SeqCst)
            }
            _ => false,
        }
    }

    /// Spawns a new supervision loop for the given credential, tearing down
    /// any previous one. Must be called from within a tokio runtime.
    pub fn start(&mut self, access_token: String) {
        self.stop();

        let cancel = CancellationToken::new();
        let done = Arc::new(AtomicBool::new(false));
        let (out_tx, out_rx) = mpsc::channel(16);

        self.cancel = Some(cancel.clone());
        self.done = Some(done.clone());
        self.outbound = Some(out_tx);

        let store = self.store.clone();
        let transport = self.transport.clone();
        let invalidator = self.invalidator.clone();
        let dispatcher = self.dispatcher.clone();
        let origin = self.origin.clone();

        tokio::spawn(async move {
            run_loop(
                store,
                transport,
                invalidator,
                dispatcher,
                origin,
                access_token,
                cancel,
                out_rx,
            )
            .await;
            done.store(true, Ordering::SeqCst);
        });
    }

    /// Cancels the supervision loop: pending reconnects and the open
    /// watchdog are aborted and no further events are folded.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.done = None;
        self.outbound = None;
    }

    /// Asks the backend to stream updates for one job. Dropped silently when
    /// the stream is not currently open.
    pub fn subscribe_to_job(&self, job_id: JobId) {
        if !self.store.state().connected {
            debug!(%job_id, "stream not open; dropping job subscription");
            return;
        }
        if let Some(tx) = &self.outbound {
            if tx
                .try_send(OutboundEvent::SubscribeToJob { job_id })
                .is_err()
            {
                debug!("outbound queue full; dropping job subscription");
            }
        }
    }
}

enum PumpEnd {
    Cancelled,
    ServerClose,
    Lost(String),
}

#[allow(clippy::too_many_arguments)]
async fn run_loop(
    store: SyncStore,
    transport: Arc<dyn EventTransport>,
    invalidator: Arc<dyn CacheInvalidator>,
    dispatcher: Arc<NotificationDispatcher>,
    origin: String,
    access_token: String,
    cancel: CancellationToken,
    mut out_rx: mpsc::Receiver<OutboundEvent>,
) {
    let session_id = Uuid::new_v4();
    let mut attempts: u32 = 0;

    loop {
        debug!(%session_id, attempts, "opening event stream");
        let opened = tokio::select! {
            _ = cancel.cancelled() => return,
            res = tokio::time::timeout(
                scout_config::OPEN_WATCHDOG,
                transport.open(&origin, &access_token),
            ) => res,
        };

        match opened {
            Ok(Ok(mut stream)) => {
                attempts = 0;
                store.apply(SyncEvent::StreamOpened);
                dispatcher.on_session_active();

                match pump(&store, &*invalidator, &dispatcher, &mut stream, &cancel, &mut out_rx)
                    .await
                {
                    PumpEnd::Cancelled => return,
                    PumpEnd::ServerClose => {
                        debug!(%session_id, "server closed the stream; not reconnecting");
                        store.apply(SyncEvent::StreamClosed);
                        return;
                    }
                    PumpEnd::Lost(reason) => warn!(%session_id, %reason, "event stream lost"),
                }
            }
            Ok(Err(e)) => warn!(%session_id, "event stream open failed: {e:#}"),
            Err(_) => warn!(%session_id, "event stream open timed out"),
        }

        attempts += 1;
        store.apply(SyncEvent::StreamLost { attempts });
        if attempts >= scout_config::RECONNECT_MAX_ATTEMPTS {
            warn!(%session_id, attempts, "reconnect attempts exhausted; staying disconnected");
            return;
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(scout_config::RECONNECT_DELAY) => {}
        }
    }
}

async fn pump(
    store: &SyncStore,
    invalidator: &dyn CacheInvalidator,
    dispatcher: &NotificationDispatcher,
    stream: &mut Box<dyn EventStream>,
    cancel: &CancellationToken,
    out_rx: &mut mpsc::Receiver<OutboundEvent>,
) -> PumpEnd {
    enum Step {
        Cancel,
        Outbound(Option<OutboundEvent>),
        Inbound(Result<ServerEvent, StreamEnd>),
    }

    let mut outbound_open = true;
    loop {
        // Cancellation must win over inbound events already queued on the
        // stream, so the cancel arm is polled first.
        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancel,
            out = out_rx.recv(), if outbound_open => Step::Outbound(out),
            inbound = stream.recv() => Step::Inbound(inbound),
        };

        match step {
            Step::Cancel => return PumpEnd::Cancelled,
            Step::Outbound(Some(ev)) => {
                if let Err(e) = stream.send(ev).await {
                    debug!("outbound send failed: {e:#}");
                }
            }
            // Sender side dropped with the supervisor handle; keep pumping
            // inbound events until cancellation.
            Step::Outbound(None) => outbound_open = false,
            Step::Inbound(Ok(ev)) => {
                // A cancel landing between the poll and this handler must
                // still suppress the fold.
                if cancel.is_cancelled() {
                    return PumpEnd::Cancelled;
                }
                fold(store, invalidator, dispatcher, ev);
            }
            Step::Inbound(Err(StreamEnd::ServerClose)) => return PumpEnd::ServerClose,
            Step::Inbound(Err(StreamEnd::Lost(reason))) => return PumpEnd::Lost(reason),
        }
    }
}

/// Classifies one inbound event, folds it, marks caches stale, and lets the
/// dispatcher decide whether it warrants a toast.
fn fold(
    store: &SyncStore,
    invalidator: &dyn CacheInvalidator,
    dispatcher: &NotificationDispatcher,
    server_event: ServerEvent,
) {
    let ev = match server_event {
        ServerEvent::ConnectionStatus(status) => SyncEvent::ConnectionStatusChanged(status),
        ServerEvent::JobUpdate(update) => SyncEvent::JobUpdated(update),
        ServerEvent::JobCompleted(record) => SyncEvent::JobCompleted(record),
        ServerEvent::CreditsUpdated(record) => SyncEvent::CreditsUpdated(record),
        ServerEvent::DiscoveryResults(record) => SyncEvent::DiscoveryResultsReceived(record),
        ServerEvent::Error(payload) => {
            warn!(%payload, "backend reported a stream error");
            return;
        }
    };

    store.apply(ev.clone());
    invalidate_for(invalidator, &ev);
    dispatcher.observe(&ev);
}
