use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use muffin_sdk::objects::{WebhookAck, WebhookEvent};

use super::BayouApiError;
use crate::state::AppState;

/// `POST /bayou/webhook`: accept a provider webhook delivery.
///
/// The event is published on the bus before the response is sent, so any
/// waiter it settles has already been resolved. Unrecognised event names are
/// acknowledged like any other.
pub(super) async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, BayouApiError> {
    let event: WebhookEvent =
        serde_json::from_slice(&body).map_err(BayouApiError::MalformedWebhook)?;

    tracing::info!(
        event = %event.event,
        customer_id = %event.customer_id(),
        "Received webhook"
    );
    let delivered = state.bus.publish(&event);
    tracing::debug!(event = %event.event, delivered, "Webhook dispatched");

    Ok(Json(WebhookAck { received: true }))
}
