use axum::{Json, extract::State, response::IntoResponse};
use muffin_sdk::objects::SignInResponse;

use super::BayouApiError;
use crate::state::AppState;

const SIGN_IN_MESSAGE: &str = "Open the onboarding link to connect your utility account";

/// `POST /bayou`: create a customer for the configured utility and return
/// the provider's customer object.
pub(super) async fn create_customer(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BayouApiError> {
    let customer = state
        .utility
        .create_customer()
        .await
        .map_err(BayouApiError::CreateCustomer)?;
    tracing::info!(customer_id = %customer.id, "Created customer");
    Ok(Json(customer))
}

/// `POST /bayou/signIn`: create a customer and drive its onboarding in the
/// background.
///
/// Progress is available from `GET /onboarding/{customer_id}`.
pub(super) async fn sign_in(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BayouApiError> {
    let run = state
        .onboarding
        .start()
        .await
        .map_err(BayouApiError::SignIn)?;
    let response = SignInResponse {
        onboarding_link: run.customer().onboarding_link.clone(),
        customer_id: run.customer_id(),
        message: SIGN_IN_MESSAGE.to_string(),
    };
    state.tracker.spawn(run);

    Ok(Json(response))
}
