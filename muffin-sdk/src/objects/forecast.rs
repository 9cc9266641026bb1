//! Forecasting data API request and response types.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Kind of consumption a record measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumptionVariable {
    #[serde(rename = "consumption.electricity")]
    Electricity,
    #[serde(rename = "consumption.fossil_fuel")]
    FossilFuel,
}

/// Historical consumption over one billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub from_datetime: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub to_datetime: OffsetDateTime,
    pub variable: ConsumptionVariable,
    /// kWh
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hour,
    Day,
    Month,
}

/// Forecast window and location.
///
/// Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub address: String,
    pub from_datetime: Date,
    pub to_datetime: Date,
    #[serde(default)]
    pub granularity: Granularity,
}

/// HVAC schedule hint passed along with a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacInfo {
    pub variable: String,
    pub start_time: u32,
    pub duration: u32,
    pub setpoint: f64,
}

impl HvacInfo {
    /// Evening heating profile used for every forecast.
    pub fn default_heating() -> Self {
        Self {
            variable: "heating".to_string(),
            start_time: 12,
            duration: 3,
            setpoint: 21.0,
        }
    }
}

/// Body of `POST /consumption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRequest {
    pub forecast: ForecastRequest,
    pub consumption_records: Vec<ConsumptionRecord>,
    #[serde(rename = "HVAC_info")]
    pub hvac_info: Vec<HvacInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponseRecord {
    pub month_year: String,
    pub baseline_cost: f64,
    pub action_cost: f64,
    pub action_savings: f64,
}

/// Response of `POST /consumption`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionResponse {
    pub monthly_forecasts: Vec<ForecastResponseRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
