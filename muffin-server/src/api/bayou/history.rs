use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use muffin_core::processors::{BillHistoryQuery, ForecastQuery};
use muffin_sdk::objects::CustomerId;
use serde::Deserialize;

use super::BayouApiError;
use crate::state::AppState;

const DEFAULT_MONTHS: u32 = 12;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HistoryParams {
    customer_id: Option<String>,
    months: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ForecastParams {
    customer_id: Option<String>,
    months_before: Option<String>,
    months: Option<String>,
}

/// A positive month count, or the default when absent.
fn parse_months(value: Option<&str>, error: &'static str) -> Result<u32, BayouApiError> {
    match value {
        None => Ok(DEFAULT_MONTHS),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|months| *months > 0)
            .ok_or(BayouApiError::BadRequest(error)),
    }
}

fn parse_customer_id(value: Option<&str>) -> Result<CustomerId, BayouApiError> {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id != 0)
        .map(CustomerId)
        .ok_or(BayouApiError::BadRequest("Invalid customerId parameter"))
}

/// `GET /bayou/history?customerId=&months=`: consumption records for the
/// bills of the last `months` months (default 12).
pub(super) async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, BayouApiError> {
    let months = parse_months(params.months.as_deref(), "Invalid months parameter")?;
    let customer_id = parse_customer_id(params.customer_id.as_deref())?;

    let records = state
        .history
        .process(BillHistoryQuery::now(customer_id, months))
        .await
        .map_err(BayouApiError::History)?;
    Ok(Json(records))
}

/// `POST /bayou/forecast?customerId=&monthsBefore=&months=`: forecast
/// `months` ahead from `monthsBefore` months of history (both default 12).
pub(super) async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Result<impl IntoResponse, BayouApiError> {
    let customer_id = parse_customer_id(params.customer_id.as_deref())?;
    let months_before =
        parse_months(params.months_before.as_deref(), "Invalid monthsBefore parameter")?;
    let months_after = parse_months(params.months.as_deref(), "Invalid monthsAfter parameter")?;

    let forecast = state
        .forecast
        .process(ForecastQuery::now(customer_id, months_before, months_after))
        .await
        .map_err(BayouApiError::Forecast)?;
    Ok(Json(forecast))
}
