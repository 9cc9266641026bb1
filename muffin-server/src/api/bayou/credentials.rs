use std::collections::BTreeMap;

use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use muffin_sdk::objects::{
    CredentialCheckRequest, CredentialCheckResponse, CredentialRecordView, CustomerId,
};

use super::BayouApiError;
use crate::state::AppState;

/// `POST /bayou/credentialCheck`: report whether the customer's
/// credentials event has been received.
///
/// A missing or zero `customer_id` is rejected; unknown customers report
/// `has_credentials: false`.
pub(super) async fn check_credentials(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, BayouApiError> {
    let request: CredentialCheckRequest =
        serde_json::from_slice(&body).map_err(BayouApiError::MalformedCredentialCheck)?;
    let customer_id = request
        .customer_id
        .filter(|id| id.0 != 0)
        .ok_or(BayouApiError::BadRequest("Customer ID is required"))?;

    Ok(Json(CredentialCheckResponse {
        has_credentials: state.credentials.has_filled_credentials(customer_id),
        last_updated: state.credentials.last_event_timestamp(customer_id),
    }))
}

/// `GET /bayou/credentials`: every stored credential record, keyed by
/// customer id.
pub(super) async fn list_credentials(State(state): State<AppState>) -> impl IntoResponse {
    let records: BTreeMap<CustomerId, CredentialRecordView> = state
        .credentials
        .all_records()
        .into_iter()
        .map(|(id, record)| (id, record.into()))
        .collect();
    Json(records)
}
