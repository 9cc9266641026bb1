//! Credential status check request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::webhook::{CustomerId, EventName, WebhookObject};

/// Request body for `POST /api/bayou/credentialCheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCheckRequest {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

/// Whether a customer has completed the credential step, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCheckResponse {
    pub has_credentials: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
}

/// A stored credential event as exposed by the diagnostic listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecordView {
    pub event: EventName,
    pub object: WebhookObject,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_timestamp_serializes_as_null() {
        let response = CredentialCheckResponse {
            has_credentials: false,
            last_updated: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "has_credentials": false, "last_updated": null })
        );
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let response = CredentialCheckResponse {
            has_credentials: true,
            last_updated: Some(time::macros::datetime!(2024-03-01 12:30:00 UTC)),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["last_updated"], "2024-03-01T12:30:00Z");
    }

    #[test]
    fn test_request_without_customer_id() {
        let request: CredentialCheckRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.customer_id, None);
    }
}
