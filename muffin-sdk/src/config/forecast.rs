//! Forecasting data API configuration.

use url::Url;

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Root of the data API; `consumption` is resolved against it.
    pub data_api_url: Url,
    /// Service address sent with every forecast request.
    pub address: String,
}
