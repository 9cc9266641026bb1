//! Webhook payload types delivered by the utility data provider.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier the provider assigns to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Name of a provider webhook event.
///
/// The variants the onboarding flow waits on are spelled out; anything else
/// the provider sends is kept verbatim in [`EventName::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    CustomerHasFilledCredentials,
    BillsReady,
    IntervalsReady,
    Other(String),
}

impl EventName {
    pub fn as_str(&self) -> &str {
        match self {
            EventName::CustomerHasFilledCredentials => "customer_has_filled_credentials",
            EventName::BillsReady => "bills_ready",
            EventName::IntervalsReady => "intervals_ready",
            EventName::Other(name) => name,
        }
    }
}

impl From<&str> for EventName {
    fn from(value: &str) -> Self {
        match value {
            "customer_has_filled_credentials" => EventName::CustomerHasFilledCredentials,
            "bills_ready" => EventName::BillsReady,
            "intervals_ready" => EventName::IntervalsReady,
            other => EventName::Other(other.to_string()),
        }
    }
}

impl From<String> for EventName {
    fn from(value: String) -> Self {
        match EventName::from(value.as_str()) {
            EventName::Other(_) => EventName::Other(value),
            known => known,
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(EventName::from)
    }
}

/// The `object` part of a webhook delivery.
///
/// Only the customer id is interpreted; every other field is carried along
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookObject {
    pub id: CustomerId,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single webhook delivery as posted by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: EventName,
    pub object: WebhookObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

impl WebhookEvent {
    /// Build an event carrying nothing but a customer id.
    pub fn new(event: EventName, customer_id: CustomerId) -> Self {
        Self {
            event,
            object: WebhookObject {
                id: customer_id,
                extra: serde_json::Map::new(),
            },
            timestamp: None,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.object.id
    }
}

/// Acknowledgement returned for every accepted delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}
