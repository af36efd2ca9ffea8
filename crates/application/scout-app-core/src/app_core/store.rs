use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::domain::SyncState;

use super::{events::SyncEvent, reducer::reduce};

type Listener = Box<dyn Fn(&SyncState) + Send + 'static>;
type ListenerMap = Mutex<HashMap<u64, Listener>>;

/// Shared state container. `apply` folds an event through the reducer and
/// fans the resulting snapshot out to every registered listener; consumers
/// only ever see whole snapshots, never partial updates.
///
/// Listeners run on the fold thread and must not call back into the store.
#[derive(Clone)]
pub struct SyncStore {
    inner: Arc<Mutex<SyncState>>,
    listeners: Arc<ListenerMap>,
    next_listener_id: Arc<AtomicU64>,
}

impl Default for SyncStore {
    fn default() -> Self {
        Self::new(SyncState::default())
    }
}

impl SyncStore {
    pub fn new(state: SyncState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
            listeners: Arc::new(Mutex::new(HashMap::new())),
            next_listener_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SyncState {
        self.inner.lock().unwrap().clone()
    }

    pub fn apply(&self, ev: SyncEvent) {
        let snapshot = {
            let mut guard = self.inner.lock().unwrap();
            let next = reduce(guard.clone(), ev);
            *guard = next;
            guard.clone()
        };
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.values() {
            listener(&snapshot);
        }
    }

    /// Registers a listener invoked after every fold. The returned guard
    /// unregisters it on drop.
    pub fn subscribe(&self, listener: impl Fn(&SyncState) + Send + 'static) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap()
            .insert(id, Box::new(listener));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }
}

/// Removes its listener from the store when dropped.
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerMap>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().unwrap().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_observe_each_fold_until_unsubscribed() {
        let store = SyncStore::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_ref = seen.clone();
        let sub = store.subscribe(move |snapshot| {
            seen_ref.lock().unwrap().push(snapshot.connected);
        });

        store.apply(SyncEvent::StreamOpened);
        store.apply(SyncEvent::StreamClosed);
        drop(sub);
        store.apply(SyncEvent::StreamOpened);

        assert_eq!(seen.lock().unwrap().as_slice(), &[true, false]);
    }

    #[test]
    fn snapshots_are_independent_of_later_folds() {
        let store = SyncStore::default();
        let before = store.state();
        store.apply(SyncEvent::StreamOpened);

        assert!(!before.connected);
        assert!(store.state().connected);
    }
}
