//! Typed publish/subscribe for webhook events.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use super::{EventName, WebhookEvent};

/// What a listener wants done with itself after handling a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    /// Stay registered for later publications.
    Keep,
    /// Remove this listener before `publish` returns.
    Remove,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    event: EventName,
    id: u64,
}

type Listener = Arc<dyn Fn(&WebhookEvent) -> ListenerControl + Send + Sync>;

/// Named-event bus with "notify every subscriber, in registration order"
/// delivery.
///
/// Cloning is cheap and every clone refers to the same listener table.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Default)]
struct EventBusInner {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<EventName, Vec<(u64, Listener)>>>,
}

impl EventBusInner {
    fn table(&self) -> MutexGuard<'_, HashMap<EventName, Vec<(u64, Listener)>>> {
        // Listeners never run under this lock, so a poisoned table is still
        // consistent.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for publications of `event`.
    pub fn subscribe<F>(&self, event: EventName, listener: F) -> SubscriptionHandle
    where
        F: Fn(&WebhookEvent) -> ListenerControl + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .table()
            .entry(event.clone())
            .or_default()
            .push((id, Arc::new(listener)));
        trace!(%event, id, "Listener subscribed");
        SubscriptionHandle { event, id }
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let mut table = self.inner.table();
        let Some(listeners) = table.get_mut(&handle.event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != handle.id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            table.remove(&handle.event);
        }
        if removed {
            trace!(event = %handle.event, id = handle.id, "Listener unsubscribed");
        }
        removed
    }

    /// Deliver `event` to every listener registered for `event.event`.
    ///
    /// Listeners run synchronously, in registration order, on the calling
    /// thread. The set of listeners is fixed when the publication starts;
    /// listeners may subscribe or unsubscribe from inside the callback.
    ///
    /// Returns the number of listeners invoked.
    pub fn publish(&self, event: &WebhookEvent) -> usize {
        let snapshot: Vec<(u64, Listener)> = self
            .inner
            .table()
            .get(&event.event)
            .cloned()
            .unwrap_or_default();

        let mut finished = Vec::new();
        for (id, listener) in &snapshot {
            if listener(event) == ListenerControl::Remove {
                finished.push(*id);
            }
        }

        if !finished.is_empty() {
            let mut table = self.inner.table();
            if let Some(listeners) = table.get_mut(&event.event) {
                listeners.retain(|(id, _)| !finished.contains(id));
                if listeners.is_empty() {
                    table.remove(&event.event);
                }
            }
        }

        debug!(
            event = %event.event,
            customer_id = %event.customer_id(),
            listeners = snapshot.len(),
            removed = finished.len(),
            "Published webhook event"
        );
        snapshot.len()
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &EventName) -> usize {
        self.inner.table().get(event).map_or(0, Vec::len)
    }
}
