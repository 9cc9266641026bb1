//! Last credential-completion event per customer.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use muffin_sdk::objects::CredentialRecordView;
use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::events::{
    CustomerId, EventBus, EventName, ListenerControl, SubscriptionHandle, WebhookEvent,
    WebhookObject,
};

/// Stored copy of a `customer_has_filled_credentials` delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub event: EventName,
    pub object: WebhookObject,
    /// When this process received the event.
    pub timestamp: OffsetDateTime,
}

impl From<CredentialRecord> for CredentialRecordView {
    fn from(record: CredentialRecord) -> Self {
        Self {
            event: record.event,
            object: record.object,
            timestamp: record.timestamp,
        }
    }
}

/// Customer id -> most recent credential record.
///
/// Contents live only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    records: Arc<RwLock<HashMap<CustomerId, CredentialRecord>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` stamped with the current time.
    ///
    /// Returns `false` if the event is not a credential event and was ignored.
    pub fn record_event(&self, event: &WebhookEvent) -> bool {
        self.record_event_at(event, OffsetDateTime::now_utc())
    }

    pub fn record_event_at(&self, event: &WebhookEvent, timestamp: OffsetDateTime) -> bool {
        if event.event != EventName::CustomerHasFilledCredentials {
            trace!(event = %event.event, "Ignoring non-credential event");
            return false;
        }
        let customer_id = event.customer_id();
        let record = CredentialRecord {
            event: event.event.clone(),
            object: event.object.clone(),
            timestamp,
        };
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(customer_id, record);
        debug!(%customer_id, "Recorded credential event");
        true
    }

    pub fn has_filled_credentials(&self, customer_id: CustomerId) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&customer_id)
    }

    pub fn last_event_timestamp(&self, customer_id: CustomerId) -> Option<OffsetDateTime> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&customer_id)
            .map(|record| record.timestamp)
    }

    /// Every stored record, ordered by customer id.
    pub fn all_records(&self) -> BTreeMap<CustomerId, CredentialRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }

    /// Keep this store updated from `bus` until the handle is unsubscribed.
    pub fn attach(&self, bus: &EventBus) -> SubscriptionHandle {
        let store = self.clone();
        bus.subscribe(EventName::CustomerHasFilledCredentials, move |event| {
            store.record_event(event);
            ListenerControl::Keep
        })
    }
}
