//! Utility provider API handlers.
//!
//! # Endpoints
//!
//! - `POST /bayou`                 – create a provider customer
//! - `POST /bayou/signIn`          – create a customer and start onboarding
//! - `POST /bayou/webhook`         – provider webhook delivery
//! - `POST /bayou/credentialCheck` – has a customer filled in credentials?
//! - `GET  /bayou/credentials`     – diagnostic dump of the credential store
//! - `GET  /bayou/history`         – bill history as consumption records
//! - `POST /bayou/forecast`        – consumption forecast from bill history

mod credentials;
mod customers;
mod history;
mod webhook;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use muffin_core::processors::{HistoryError, OnboardingError};
use muffin_sdk::client::ClientError;

use super::error_response;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bayou", post(customers::create_customer))
        .route("/bayou/signIn", post(customers::sign_in))
        .route("/bayou/webhook", post(webhook::receive_webhook))
        .route("/bayou/credentialCheck", post(credentials::check_credentials))
        .route("/bayou/credentials", get(credentials::list_credentials))
        .route("/bayou/history", get(history::get_history))
        .route("/bayou/forecast", post(history::get_forecast))
}

/// Errors that can occur in utility provider API handlers.
#[derive(Debug)]
enum BayouApiError {
    /// A request parameter is missing or invalid.
    BadRequest(&'static str),
    /// The webhook body is not a valid event.
    MalformedWebhook(serde_json::Error),
    /// The credential check body is not valid JSON.
    MalformedCredentialCheck(serde_json::Error),
    CreateCustomer(ClientError),
    SignIn(OnboardingError),
    History(HistoryError),
    Forecast(HistoryError),
}

impl IntoResponse for BayouApiError {
    fn into_response(self) -> Response {
        match self {
            BayouApiError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            BayouApiError::MalformedWebhook(e) => {
                tracing::error!(error = %e, "Failed to parse webhook body");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process webhook",
                )
            }
            BayouApiError::MalformedCredentialCheck(e) => {
                tracing::error!(error = %e, "Failed to parse credential check body");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to check credentials status",
                )
            }
            BayouApiError::CreateCustomer(e) => {
                tracing::error!(error = %e, "Failed to create customer");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to create customer: {e}"),
                )
            }
            BayouApiError::SignIn(e) => {
                tracing::error!(error = %e, "Failed to generate sign-in link");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate sign-in link: {e}"),
                )
            }
            BayouApiError::History(e) => {
                tracing::error!(error = %e, "Failed to fetch bill history");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to fetch bill history: {e}"),
                )
            }
            BayouApiError::Forecast(e) => {
                tracing::error!(error = %e, "Failed to generate forecast");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate forecast: {e}"),
                )
            }
        }
    }
}
