//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `/bayou/...`                  – utility provider integration, see [`bayou`]
//! - `GET /onboarding/{customer_id}` – onboarding progress of a signed-in customer
//! - `GET /palmetto/health`        – energy-intelligence API health proxy

mod bayou;
mod onboarding;
mod palmetto;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, response::Response};
use muffin_sdk::objects::ErrorResponse;

use crate::state::AppState;

/// Build the API router, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(bayou::router())
        .merge(onboarding::router())
        .merge(palmetto::router())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
