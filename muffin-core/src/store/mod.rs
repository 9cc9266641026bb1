//! In-memory state derived from webhook deliveries.

pub mod credentials;

pub use credentials::{CredentialRecord, CredentialStore};
