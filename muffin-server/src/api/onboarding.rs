//! `GET /onboarding/{customer_id}` – progress of a flow started by sign-in.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use muffin_sdk::objects::{CustomerId, OnboardingStatusResponse};

use super::error_response;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/onboarding/{customer_id}", get(get_onboarding_status))
}

async fn get_onboarding_status(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<impl IntoResponse, OnboardingApiError> {
    let customer_id = CustomerId(customer_id);
    let status = state
        .tracker
        .get(customer_id)
        .ok_or(OnboardingApiError::NotFound)?;

    Ok(Json(OnboardingStatusResponse {
        customer_id,
        stage: status.stage,
        error: status.error,
    }))
}

#[derive(Debug)]
enum OnboardingApiError {
    NotFound,
}

impl IntoResponse for OnboardingApiError {
    fn into_response(self) -> Response {
        match self {
            OnboardingApiError::NotFound => {
                error_response(StatusCode::NOT_FOUND, "Onboarding not found")
            }
        }
    }
}
