//! In-process webhook event routing.
//!
//! Inbound webhook deliveries are published on the [`EventBus`]; consumers
//! that need "the next `bills_ready` for customer 42" go through the
//! [`EventWaiter`], which turns the push-style bus into a single awaitable
//! result bounded by a timeout.
//!
//! # Event Flow
//!
//! 1. Webhook handler parses the body into a `WebhookEvent` and publishes it
//! 2. The `CredentialStore` listener upserts `customer_has_filled_credentials`
//! 3. Every `PendingWait` registered for the event name checks the customer
//!    id; the first match settles the wait and removes its listener
//!
//! Nothing is buffered: a publication reaches only the listeners registered
//! at the time it is made.

pub mod bus;
pub mod waiter;

pub use bus::{EventBus, ListenerControl, SubscriptionHandle};
pub use waiter::{EventWaiter, PendingWait, WaitError};

pub use muffin_sdk::objects::webhook::{CustomerId, EventName, WebhookEvent, WebhookObject};
