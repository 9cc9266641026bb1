//! Consumption history and forecasting.
//!
//! Bills from the utility provider are turned into consumption records and,
//! for a forecast, posted to the forecasting data API together with the
//! forecast window.

use std::sync::Arc;

use kanau::processor::Processor;
use muffin_sdk::client::ClientError;
use muffin_sdk::objects::{
    Bill, ConsumptionRecord, ConsumptionRequest, ConsumptionResponse, ConsumptionVariable,
    CustomerId, ForecastRequest, Granularity, HvacInfo,
};
use thiserror::Error;
use time::error::ComponentRange;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::provider::{ForecastProvider, UtilityProvider};
use crate::utils::dates::{parse_provider_date, shift_months};

/// Energy content of one therm of natural gas, in kWh.
pub const THERMS_TO_KWH: f64 = 29.3001;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("utility provider error: {0}")]
    Provider(#[source] ClientError),

    #[error("forecast API error: {0}")]
    Forecast(#[source] ClientError),

    #[error("date out of range: {0}")]
    DateRange(#[from] ComponentRange),
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Consumption of a bill in kWh.
///
/// Electricity wins when it is present and non-zero; otherwise the gas usage
/// is converted from therms.
pub fn bill_consumption_kwh(bill: &Bill) -> f64 {
    match bill.electricity_consumption {
        Some(kwh) if kwh != 0.0 => kwh,
        _ => bill.gas_consumption.unwrap_or(0.0) * THERMS_TO_KWH,
    }
}

/// Map bills to consumption records, keeping only bills with both period
/// dates whose period starts at or after `since`.
pub fn bills_to_consumption_records(
    bills: &[Bill],
    since: OffsetDateTime,
) -> Vec<ConsumptionRecord> {
    bills
        .iter()
        .filter_map(|bill| {
            let from = bill.billing_period_from.as_deref().and_then(parse_provider_date);
            let to = bill.billing_period_to.as_deref().and_then(parse_provider_date);
            let (Some(from), Some(to)) = (from, to) else {
                debug!(bill_id = bill.id, "Skipping bill without billing period");
                return None;
            };
            (from >= since).then(|| ConsumptionRecord {
                from_datetime: from,
                to_datetime: to,
                variable: ConsumptionVariable::Electricity,
                value: bill_consumption_kwh(bill),
            })
        })
        .collect()
}

/// Forecast window running from `months_before` months before `today` to
/// `months_after` months after it, at monthly granularity.
pub fn build_forecast_request(
    address: &str,
    today: Date,
    months_before: u32,
    months_after: u32,
) -> Result<ForecastRequest, ComponentRange> {
    Ok(ForecastRequest {
        address: address.to_string(),
        from_datetime: shift_months(today, -months_to_i32(months_before))?,
        to_datetime: shift_months(today, months_to_i32(months_after))?,
        granularity: Granularity::Month,
    })
}

fn months_to_i32(months: u32) -> i32 {
    i32::try_from(months).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Processors
// ---------------------------------------------------------------------------

/// Bill history for one customer over the last `months` months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillHistoryQuery {
    pub customer_id: CustomerId,
    pub months: u32,
    pub as_of: OffsetDateTime,
}

impl BillHistoryQuery {
    pub fn now(customer_id: CustomerId, months: u32) -> Self {
        Self {
            customer_id,
            months,
            as_of: OffsetDateTime::now_utc(),
        }
    }
}

/// Forecast for one customer, seeded with `months_before` months of history
/// and extending `months_after` months ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastQuery {
    pub customer_id: CustomerId,
    pub months_before: u32,
    pub months_after: u32,
    pub as_of: OffsetDateTime,
}

impl ForecastQuery {
    pub fn now(customer_id: CustomerId, months_before: u32, months_after: u32) -> Self {
        Self {
            customer_id,
            months_before,
            months_after,
            as_of: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Clone)]
pub struct ConsumptionHistory {
    provider: Arc<dyn UtilityProvider>,
}

impl ConsumptionHistory {
    pub fn new(provider: Arc<dyn UtilityProvider>) -> Self {
        Self { provider }
    }
}

impl Processor<BillHistoryQuery> for ConsumptionHistory {
    type Output = Vec<ConsumptionRecord>;
    type Error = HistoryError;

    #[tracing::instrument(skip_all, err, fields(customer_id = %query.customer_id))]
    async fn process(&self, query: BillHistoryQuery) -> Result<Self::Output, Self::Error> {
        info!(months = query.months, "Fetching bill history");
        let since_date = shift_months(query.as_of.date(), -months_to_i32(query.months))?;
        let since = query.as_of.replace_date(since_date);

        let bills = self
            .provider
            .get_customer_bills(query.customer_id)
            .await
            .map_err(HistoryError::Provider)?;
        let records = bills_to_consumption_records(&bills, since);
        debug!(
            bills = bills.len(),
            records = records.len(),
            "Mapped bills to consumption records"
        );
        Ok(records)
    }
}

#[derive(Clone)]
pub struct ForecastPipeline {
    history: ConsumptionHistory,
    forecast: Arc<dyn ForecastProvider>,
}

impl ForecastPipeline {
    pub fn new(provider: Arc<dyn UtilityProvider>, forecast: Arc<dyn ForecastProvider>) -> Self {
        Self {
            history: ConsumptionHistory::new(provider),
            forecast,
        }
    }
}

impl Processor<ForecastQuery> for ForecastPipeline {
    type Output = ConsumptionResponse;
    type Error = HistoryError;

    #[tracing::instrument(skip_all, err, fields(customer_id = %query.customer_id))]
    async fn process(&self, query: ForecastQuery) -> Result<Self::Output, Self::Error> {
        let consumption_records = self
            .history
            .process(BillHistoryQuery {
                customer_id: query.customer_id,
                months: query.months_before,
                as_of: query.as_of,
            })
            .await?;

        let forecast = build_forecast_request(
            self.forecast.address(),
            query.as_of.date(),
            query.months_before,
            query.months_after,
        )?;
        info!(
            from = %forecast.from_datetime,
            to = %forecast.to_datetime,
            records = consumption_records.len(),
            "Requesting consumption forecast"
        );

        let request = ConsumptionRequest {
            forecast,
            consumption_records,
            hvac_info: vec![HvacInfo::default_heating()],
        };
        self.forecast
            .consumption(&request)
            .await
            .map_err(HistoryError::Forecast)
    }
}
