//! One-shot waits on the event bus.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::bus::{EventBus, ListenerControl, SubscriptionHandle};
use super::{CustomerId, EventName, WebhookEvent};

#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    #[error("timed out after {after:?} waiting for {event} for customer {customer_id}")]
    Timeout {
        event: EventName,
        customer_id: CustomerId,
        after: Duration,
    },
    #[error("event wait closed before an event arrived")]
    Closed,
}

type Slot = Arc<Mutex<Option<oneshot::Sender<WebhookEvent>>>>;

/// Roughly 30 years, used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Creates bounded waits for "the next `event` about `customer_id`".
#[derive(Clone)]
pub struct EventWaiter {
    bus: EventBus,
    timeout: Duration,
}

impl EventWaiter {
    pub fn new(bus: EventBus, timeout: Duration) -> Self {
        Self { bus, timeout }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe now and return a handle to await later.
    ///
    /// The listener is in place when this returns, so an event published
    /// between `register` and [`PendingWait::wait`] is not lost. The timeout
    /// clock also starts here.
    pub fn register(&self, event: EventName, customer_id: CustomerId) -> PendingWait {
        let (tx, rx) = oneshot::channel();
        let slot: Slot = Arc::new(Mutex::new(Some(tx)));

        let listener_slot = Arc::clone(&slot);
        let handle = self.bus.subscribe(event.clone(), move |published| {
            if published.customer_id() != customer_id {
                debug!(
                    event = %published.event,
                    expected = %customer_id,
                    got = %published.customer_id(),
                    "Ignoring webhook for another customer"
                );
                return ListenerControl::Keep;
            }
            let mut guard = listener_slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(tx) = guard.take() {
                // The receiver may already be gone if the wait was dropped.
                let _ = tx.send(published.clone());
            }
            ListenerControl::Remove
        });

        debug!(%event, %customer_id, timeout = ?self.timeout, "Waiting for webhook event");

        PendingWait {
            bus: self.bus.clone(),
            handle,
            slot,
            rx,
            deadline: deadline_after(self.timeout),
            event,
            customer_id,
            timeout: self.timeout,
        }
    }

    /// Register and wait in one step.
    pub async fn wait_for(
        &self,
        event: EventName,
        customer_id: CustomerId,
    ) -> Result<WebhookEvent, WaitError> {
        self.register(event, customer_id).wait().await
    }
}

/// A registered wait that has not been awaited yet.
///
/// Dropping it removes the listener from the bus.
pub struct PendingWait {
    bus: EventBus,
    handle: SubscriptionHandle,
    slot: Slot,
    rx: oneshot::Receiver<WebhookEvent>,
    deadline: Instant,
    event: EventName,
    customer_id: CustomerId,
    timeout: Duration,
}

impl PendingWait {
    /// True once a matching event or the timeout has claimed this wait.
    pub fn is_settled(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Resolve with the first matching event, or fail once the deadline set
    /// at registration passes.
    pub async fn wait(mut self) -> Result<WebhookEvent, WaitError> {
        match tokio::time::timeout_at(self.deadline, &mut self.rx).await {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(_)) => Err(WaitError::Closed),
            Err(_) => self.expire(),
        }
    }

    /// Settle at the deadline. Whichever of this and a matching publication
    /// takes the slot first decides the outcome.
    fn expire(&mut self) -> Result<WebhookEvent, WaitError> {
        let claimed = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if claimed {
            warn!(
                event = %self.event,
                customer_id = %self.customer_id,
                timeout = ?self.timeout,
                "Timed out waiting for webhook event"
            );
            return Err(WaitError::Timeout {
                event: self.event.clone(),
                customer_id: self.customer_id,
                after: self.timeout,
            });
        }
        // A matching event won the race right at the deadline.
        self.rx.try_recv().map_err(|_| WaitError::Closed)
    }
}

impl Drop for PendingWait {
    fn drop(&mut self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.bus.unsubscribe(&self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(300);

    fn waiter() -> EventWaiter {
        EventWaiter::new(EventBus::new(), TIMEOUT)
    }

    fn event(name: EventName, id: i64) -> WebhookEvent {
        WebhookEvent::new(name, CustomerId(id))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignores_other_customers() {
        let waiter = waiter();
        let pending = waiter.register(EventName::BillsReady, CustomerId(42));

        waiter.bus().publish(&event(EventName::BillsReady, 99));
        assert!(!pending.is_settled());
        assert_eq!(waiter.bus().listener_count(&EventName::BillsReady), 1);

        waiter.bus().publish(&event(EventName::BillsReady, 42));
        assert!(pending.is_settled());

        let received = pending.wait().await.unwrap();
        assert_eq!(received.customer_id(), CustomerId(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_at_most_once() {
        let waiter = waiter();
        let pending = waiter.register(EventName::IntervalsReady, CustomerId(7));

        assert_eq!(waiter.bus().publish(&event(EventName::IntervalsReady, 7)), 1);
        assert_eq!(waiter.bus().listener_count(&EventName::IntervalsReady), 0);
        assert_eq!(waiter.bus().publish(&event(EventName::IntervalsReady, 7)), 0);

        assert!(pending.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_matching_event() {
        let waiter = waiter();
        let started = Instant::now();

        let result = waiter
            .wait_for(EventName::CustomerHasFilledCredentials, CustomerId(3))
            .await;

        match result {
            Err(WaitError::Timeout {
                event,
                customer_id,
                after,
            }) => {
                assert_eq!(event, EventName::CustomerHasFilledCredentials);
                assert_eq!(customer_id, CustomerId(3));
                assert_eq!(after, TIMEOUT);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(started.elapsed() >= TIMEOUT);
        assert_eq!(
            waiter
                .bus()
                .listener_count(&EventName::CustomerHasFilledCredentials),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_when_event_arrives_before_deadline() {
        let waiter = waiter();
        let pending = waiter.register(EventName::BillsReady, CustomerId(42));

        let bus = waiter.bus().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            bus.publish(&event(EventName::BillsReady, 42));
        });

        let received = pending.wait().await.unwrap();
        assert_eq!(received.event, EventName::BillsReady);
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_before_wait_is_not_lost() {
        let waiter = waiter();
        let pending = waiter.register(EventName::BillsReady, CustomerId(1));

        waiter.bus().publish(&event(EventName::BillsReady, 1));
        tokio::time::advance(Duration::from_secs(60)).await;

        assert!(pending.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_unsubscribes() {
        let waiter = waiter();
        let pending = waiter.register(EventName::BillsReady, CustomerId(5));
        assert_eq!(waiter.bus().listener_count(&EventName::BillsReady), 1);

        drop(pending);
        assert_eq!(waiter.bus().listener_count(&EventName::BillsReady), 0);
        assert_eq!(waiter.bus().publish(&event(EventName::BillsReady, 5)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_matching_waiter_gets_its_own_copy() {
        let waiter = waiter();
        let first = waiter.register(EventName::CustomerHasFilledCredentials, CustomerId(42));
        let other = waiter.register(EventName::CustomerHasFilledCredentials, CustomerId(99));
        let second = waiter.register(EventName::CustomerHasFilledCredentials, CustomerId(42));

        let delivered = waiter
            .bus()
            .publish(&event(EventName::CustomerHasFilledCredentials, 42));
        assert_eq!(delivered, 3);

        assert!(first.is_settled());
        assert!(second.is_settled());
        assert!(!other.is_settled());
        assert_eq!(
            waiter
                .bus()
                .listener_count(&EventName::CustomerHasFilledCredentials),
            1
        );

        assert_eq!(first.wait().await.unwrap().customer_id(), CustomerId(42));
        assert_eq!(second.wait().await.unwrap().customer_id(), CustomerId(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_at_deadline_wins_over_timeout() {
        let waiter = waiter();
        let mut pending = waiter.register(EventName::BillsReady, CustomerId(4));

        tokio::time::advance(TIMEOUT).await;
        waiter.bus().publish(&event(EventName::BillsReady, 4));

        let received = pending.expire().unwrap();
        assert_eq!(received.customer_id(), CustomerId(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_without_event_times_out() {
        let waiter = waiter();
        let mut pending = waiter.register(EventName::BillsReady, CustomerId(4));

        tokio::time::advance(TIMEOUT).await;
        assert!(matches!(pending.expire(), Err(WaitError::Timeout { .. })));
        assert!(pending.is_settled());

        // The slot is claimed, so a late publication delivers nothing.
        waiter.bus().publish(&event(EventName::BillsReady, 4));
        assert!(pending.rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_timeout_does_not_overflow() {
        let waiter = EventWaiter::new(EventBus::new(), Duration::from_secs(u64::MAX));
        let pending = waiter.register(EventName::BillsReady, CustomerId(1));
        assert!(!pending.is_settled());

        waiter.bus().publish(&event(EventName::BillsReady, 1));
        assert!(pending.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_after_timeout_is_harmless() {
        let waiter = waiter();
        let result = waiter.wait_for(EventName::BillsReady, CustomerId(8)).await;
        assert!(matches!(result, Err(WaitError::Timeout { .. })));

        assert_eq!(waiter.bus().publish(&event(EventName::BillsReady, 8)), 0);
    }
}
