//! # Change Subscriber
//!
//! Defines the receiving side of the bus.

use crate::events::{ChangeEvent, ObserverId};
use crate::publisher::ObserverMap;
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The observer was unsubscribed or the notifier was dropped.
    #[error("Subscription closed")]
    Closed,
}

/// Handle held by one observer.
///
/// When dropped, the observer is removed from the notifier's registry.
pub struct Subscription {
    id: ObserverId,
    receiver: mpsc::Receiver<ChangeEvent>,
    observers: Weak<ObserverMap>,
}

impl Subscription {
    pub(crate) fn new(
        id: ObserverId,
        receiver: mpsc::Receiver<ChangeEvent>,
        observers: Weak<ObserverMap>,
    ) -> Self {
        Self {
            id,
            receiver,
            observers,
        }
    }

    /// Id to pass to `ChangeNotifier::unsubscribe`.
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Wait for the next notification.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - The record set changed
    /// - `None` - Unsubscribed, or the notifier was dropped
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Take a pending notification without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - A notification was pending
    /// - `Ok(None)` - Nothing pending
    /// - `Err(SubscriptionError::Closed)` - Unsubscribed or notifier dropped
    pub fn try_recv(&mut self) -> Result<Option<ChangeEvent>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Block the current thread until the next notification.
    ///
    /// Must not be called from inside an async runtime.
    pub fn blocking_recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.blocking_recv()
    }

    /// Discard every pending notification, returning how many there were.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(Some(_)) = self.try_recv() {
            drained += 1;
        }
        drained
    }

    /// Convert into a `Stream` of notifications.
    #[must_use]
    pub fn into_stream(self) -> ChangeStream {
        ChangeStream { subscription: self }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        observers.lock().remove(&self.id);
        debug!(observer = %self.id, "Subscription dropped");
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators.
pub struct ChangeStream {
    subscription: Subscription,
}

impl ChangeStream {
    /// Id of the underlying observer.
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.subscription.id
    }
}

impl Stream for ChangeStream {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.subscription.receiver.poll_recv(cx)
    }
}
