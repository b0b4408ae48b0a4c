//! The state bus: one shared [`AppState`] broadcast to any number of
//! subscribers.
//!
//! Consumers are handed a bus (or a [`Storefront`](crate::Storefront)) at
//! construction time and either register a [`Subscriber`] callback or take a
//! [`watch`](StateBus::watch) receiver. Every publication carries the full
//! state.
//!
//! Only the stores in this crate can mutate state: [`StateBus::update`] is
//! crate-private. Mutations are serialized by the bus lock, and subscribers
//! are notified while it is held so publications arrive in mutation order.
//! A subscriber must therefore not call a store mutator synchronously from
//! `on_state`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::state::AppState;

/// A UI fragment that re-derives its view from every published state.
pub trait Subscriber: Send + Sync {
    /// Called once on subscription and after every mutation.
    fn on_state(&self, state: &AppState);
}

impl<F> Subscriber for F
where
    F: Fn(&AppState) + Send + Sync,
{
    fn on_state(&self, state: &AppState) {
        self(state);
    }
}

/// Handle returned by [`StateBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Shared state plus its subscriber list. Cheap to clone.
#[derive(Clone)]
pub struct StateBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    state: Mutex<AppState>,
    latest: watch::Sender<Arc<AppState>>,
    subscribers: Mutex<Vec<(SubscriberId, Arc<dyn Subscriber>)>>,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StateBus {
    /// Create a bus holding `initial`.
    #[must_use]
    pub fn new(initial: AppState) -> Self {
        let (latest, _) = watch::channel(Arc::new(initial.clone()));
        Self {
            inner: Arc::new(BusInner {
                state: Mutex::new(initial),
                latest,
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The most recently published state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.latest.borrow().clone()
    }

    /// Register a subscriber. It immediately receives the current state.
    pub fn subscribe(&self, subscriber: impl Subscriber + 'static) -> SubscriberId {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber: Arc<dyn Subscriber> = Arc::new(subscriber);

        // Hold the state lock so no publication slips in between the initial
        // delivery and registration.
        let state = lock(&self.inner.state);
        subscriber.on_state(&state);
        lock(&self.inner.subscribers).push((id, subscriber));
        drop(state);

        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = lock(&self.inner.subscribers);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    /// An async receiver that always holds the latest state.
    ///
    /// Intermediate states may be coalesced; use [`subscribe`](Self::subscribe)
    /// to observe every publication.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<AppState>> {
        self.inner.latest.subscribe()
    }

    /// Apply a mutation, then publish the new state to every subscriber.
    pub(crate) fn update<R>(&self, mutate: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = lock(&self.inner.state);
        let out = mutate(&mut state);
        self.publish(&state);
        out
    }

    /// Like [`update`](Self::update), but only publishes when the mutation
    /// reports that it changed something.
    pub(crate) fn update_if(&self, mutate: impl FnOnce(&mut AppState) -> bool) -> bool {
        let mut state = lock(&self.inner.state);
        let changed = mutate(&mut state);
        if changed {
            self.publish(&state);
        }
        changed
    }

    fn publish(&self, state: &AppState) {
        let snapshot = Arc::new(state.clone());
        self.inner.latest.send_replace(snapshot.clone());

        let subscribers: Vec<Arc<dyn Subscriber>> = lock(&self.inner.subscribers)
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber.on_state(&snapshot);
        }
    }
}

impl Default for StateBus {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

/// Request-generation counter.
///
/// Each request takes a token from [`begin`](Self::begin); its response may
/// only be applied while the token is still current. Starting a newer request
/// or calling [`invalidate`](Self::invalidate) makes older tokens stale, so a
/// slow response can never overwrite a newer one.
#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }

    pub(crate) fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::state::CatalogStatus;

    #[test]
    fn test_subscribe_receives_current_state() {
        let bus = StateBus::default();
        bus.update(|s| s.catalog = CatalogStatus::Ready);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(move |s: &AppState| lock(&*sink).push(s.catalog.clone()));

        assert_eq!(*lock(&*seen), vec![CatalogStatus::Ready]);
    }

    #[test]
    fn test_every_subscriber_sees_every_publication() {
        let bus = StateBus::default();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            bus.subscribe(move |_: &AppState| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        bus.update(|s| s.catalog = CatalogStatus::Ready);
        bus.update(|s| s.catalog = CatalogStatus::Error("down".into()));
        assert_eq!(calls.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = StateBus::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = bus.subscribe(move |_: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.update(|s| s.catalog = CatalogStatus::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_update_if_skips_publication() {
        let bus = StateBus::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        bus.subscribe(move |_: &AppState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!bus.update_if(|_| false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_watch_sees_latest() {
        let bus = StateBus::default();
        let mut rx = bus.watch();

        bus.update(|s| s.catalog = CatalogStatus::Ready);
        rx.changed().await.ok();
        assert_eq!(rx.borrow().catalog, CatalogStatus::Ready);
        assert_eq!(bus.snapshot().catalog, CatalogStatus::Ready);
    }

    #[test]
    fn test_generation() {
        let generation = Generation::default();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));

        generation.invalidate();
        assert!(!generation.is_current(second));
    }
}
