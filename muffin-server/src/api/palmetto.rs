//! `GET /palmetto/health` – proxies the energy-intelligence API health check.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use muffin_sdk::client::ClientError;

use super::error_response;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/palmetto/health", get(health))
}

async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, PalmettoApiError> {
    let health = state.palmetto.health().await.map_err(PalmettoApiError)?;
    Ok(Json(health))
}

#[derive(Debug)]
struct PalmettoApiError(ClientError);

impl IntoResponse for PalmettoApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Palmetto health check failed");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to check Palmetto health: {}", self.0),
        )
    }
}
