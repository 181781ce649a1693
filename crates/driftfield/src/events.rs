//! # DRIFTFIELD Event System
//!
//! Non-blocking fan-out of `WorldEvent`s to any number of subscribers.
//!
//! ## Architecture
//!
//! ```text
//!                          ┌──> subscriber channel ──> renderer
//! spawners ──> EventSender ┼──> subscriber channel ──> audio
//! universe ──┘             └──> subscriber channel ──> tests
//! ```
//!
//! Each subscriber owns a bounded crossbeam channel. Sending never blocks:
//! a full subscriber misses the event, a dropped subscriber is pruned.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use driftfield_shared::WorldEvent;
use parking_lot::Mutex;

type Subscribers = Arc<Mutex<Vec<Sender<WorldEvent>>>>;

/// Event bus for world lifecycle events.
///
/// Pre-allocates a bounded channel per subscriber to prevent memory growth
/// in the hot path.
pub struct EventBus {
    /// Per-subscriber channel capacity.
    capacity: usize,
    /// Live subscriber channels.
    subscribers: Subscribers,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events buffered per subscriber before new
    ///   events are dropped for that subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Registers a new subscriber. It sees events sent from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        let (sender, receiver) = bounded(self.capacity);
        self.subscribers.lock().push(sender);
        EventReceiver { receiver }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    subscribers: Subscribers,
}

impl EventSender {
    /// Sends an event to every subscriber (non-blocking).
    ///
    /// Returns the number of subscribers that accepted it. Subscribers whose
    /// receiver was dropped are removed.
    #[inline]
    pub fn send(&self, event: WorldEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;

        subscribers.retain(|subscriber| match subscriber.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::debug!("event subscriber full, event dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        delivered
    }
}

/// Handle for receiving events.
pub struct EventReceiver {
    receiver: Receiver<WorldEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    ///
    /// Returns a vector of events. Empty if no events pending.
    #[inline]
    pub fn drain(&self) -> Vec<WorldEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events pending.
    #[inline]
    pub fn try_recv(&self) -> Option<WorldEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
