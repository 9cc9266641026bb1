//! Forecasting data API client.

use reqwest::Client;

use super::{ClientError, endpoint, parse_response};
use crate::config::ForecastConfig;
use crate::objects::forecast::{ConsumptionRequest, ConsumptionResponse};

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    config: ForecastConfig,
}

impl ForecastClient {
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Service address forecasts are requested for.
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// `POST /consumption` – forecast monthly costs from historical usage.
    pub async fn consumption(
        &self,
        request: &ConsumptionRequest,
    ) -> Result<ConsumptionResponse, ClientError> {
        let url = endpoint(&self.config.data_api_url, "consumption")?;

        let resp = self.http.post(url).json(request).send().await?;

        parse_response(resp).await
    }
}
