//! # Change Publisher
//!
//! Defines the publishing side of the bus and the in-process notifier.

use crate::events::{ChangeEvent, ObserverId};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

/// Observer senders keyed by id.
pub(crate) type ObserverMap = Mutex<HashMap<ObserverId, mpsc::Sender<ChangeEvent>>>;

/// Observer registry shared between the notifier and live subscriptions.
pub(crate) type ObserverRegistry = Arc<ObserverMap>;

/// Port used by the record store to announce that the record set changed.
pub trait ChangePublisher: Send + Sync {
    /// Tell every registered observer that the record set changed.
    ///
    /// # Returns
    ///
    /// The number of observers that now hold a pending notification.
    fn notify_changed(&self) -> usize;

    /// Total number of `notify_changed` calls.
    fn notifications_sent(&self) -> u64;
}

/// In-process change notifier.
///
/// Every observer gets its own bounded `tokio::sync::mpsc` channel. Sending
/// is always `try_send`, so a slow observer can never hold up a writer.
pub struct ChangeNotifier {
    /// Registered observers keyed by id.
    observers: ObserverRegistry,

    /// Next observer id to hand out.
    next_observer: AtomicU64,

    /// Total notifications published.
    notifications_sent: AtomicU64,

    /// Per-observer channel capacity.
    capacity: usize,
}

impl ChangeNotifier {
    /// Create a notifier with the default per-observer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a notifier with the given per-observer capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            observers: Arc::new(Mutex::new(HashMap::new())),
            next_observer: AtomicU64::new(1),
            notifications_sent: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Register a new observer.
    ///
    /// The observer stays registered until [`ChangeNotifier::unsubscribe`] is
    /// called with its id or the returned `Subscription` is dropped.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.capacity);

        self.observers.lock().insert(id, sender);
        debug!(observer = %id, "Observer subscribed");

        Subscription::new(id, receiver, Arc::downgrade(&self.observers))
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let removed = self.observers.lock().remove(&id).is_some();
        if removed {
            debug!(observer = %id, "Observer unsubscribed");
        }
        removed
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Per-observer channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePublisher for ChangeNotifier {
    fn notify_changed(&self) -> usize {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);

        let mut observers = self.observers.lock();
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (id, sender) in observers.iter() {
            match sender.try_send(ChangeEvent::RecordsChanged) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    // A notification is already queued for this observer.
                    debug!(observer = %id, "Change notification coalesced");
                    delivered += 1;
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }

        for id in closed {
            observers.remove(&id);
            debug!(observer = %id, "Pruned closed observer");
        }

        debug!(receivers = delivered, "Change notification published");
        delivered
    }

    fn notifications_sent(&self) -> u64 {
        self.notifications_sent.load(Ordering::Relaxed)
    }
}
