//! Synchronous, ordered pub/sub over an explicit callback list.
//!
//! ## Delivery contract
//!
//! - All live subscribers are invoked, in subscription order, before
//!   `publish` returns, on the thread that performed the mutation.
//! - No reordering, no dropped events, no coalescing.
//! - `unsubscribe` is safe to call from inside a callback: the recipient
//!   set for the event being delivered was fixed when `publish` started,
//!   so removal takes effect from the next publish.
//!
//! The subscriber list sits behind a `Mutex` only so the notifier is
//! `Send + Sync` and `publish` can take a snapshot; callbacks run outside
//! the lock, which is what makes re-entrant subscribe/unsubscribe safe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::event::RosterEvent;

/// Handle identifying one subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Arc<dyn Fn(&RosterEvent) + Send + Sync>;

struct Entry {
    id: SubscriberId,
    callback: Callback,
}

/// Publish/subscribe channel announcing roster mutations and selection
/// changes to decoupled observers.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Entry>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Subscribers added while a publish is in
    /// flight receive events starting from the next publish.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RosterEvent) + Send + Sync + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_subscribers().push(Entry {
            id,
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns `false` if the id was already gone.
    ///
    /// Safe to call during delivery: the event currently being delivered
    /// still reaches its original recipient set.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|entry| entry.id != id);
        subscribers.len() < before
    }

    /// Deliver `event` to every subscriber, in subscription order, before
    /// returning.
    pub fn publish(&self, event: &RosterEvent) {
        // Snapshot the recipient set, then release the lock so callbacks
        // may subscribe/unsubscribe without deadlocking.
        let snapshot: Vec<Callback> = self
            .lock_subscribers()
            .iter()
            .map(|entry| Arc::clone(&entry.callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    // A subscriber that panicked mid-callback must not wedge the channel.
    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Entry>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
