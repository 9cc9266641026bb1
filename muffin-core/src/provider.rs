//! Seams between the processors and the upstream HTTP APIs.
//!
//! The SDK clients implement these traits; tests substitute in-memory fakes.

use async_trait::async_trait;
use muffin_sdk::client::{BayouClient, ClientError, ForecastClient, PalmettoClient};
use muffin_sdk::objects::{
    Bill, ConsumptionRequest, ConsumptionResponse, Customer, CustomerId, CustomerIntervals,
};

/// Utility data provider: customers, bills and interval data.
#[async_trait]
pub trait UtilityProvider: Send + Sync {
    /// Create a customer and return its onboarding link.
    async fn create_customer(&self) -> Result<Customer, ClientError>;

    async fn get_customer_bills(&self, customer_id: CustomerId) -> Result<Vec<Bill>, ClientError>;

    async fn get_customer_intervals(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerIntervals, ClientError>;
}

/// Forecasting data API.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Street address forecasts are computed for.
    fn address(&self) -> &str;

    async fn consumption(
        &self,
        request: &ConsumptionRequest,
    ) -> Result<ConsumptionResponse, ClientError>;
}

/// Energy-intelligence API liveness probe.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn health(&self) -> Result<serde_json::Value, ClientError>;
}

#[async_trait]
impl UtilityProvider for BayouClient {
    async fn create_customer(&self) -> Result<Customer, ClientError> {
        BayouClient::create_customer(self).await
    }

    async fn get_customer_bills(&self, customer_id: CustomerId) -> Result<Vec<Bill>, ClientError> {
        BayouClient::get_customer_bills(self, customer_id).await
    }

    async fn get_customer_intervals(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerIntervals, ClientError> {
        BayouClient::get_customer_intervals(self, customer_id).await
    }
}

#[async_trait]
impl ForecastProvider for ForecastClient {
    fn address(&self) -> &str {
        ForecastClient::address(self)
    }

    async fn consumption(
        &self,
        request: &ConsumptionRequest,
    ) -> Result<ConsumptionResponse, ClientError> {
        ForecastClient::consumption(self, request).await
    }
}

#[async_trait]
impl HealthProbe for PalmettoClient {
    async fn health(&self) -> Result<serde_json::Value, ClientError> {
        PalmettoClient::health(self).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use serde_json::json;

    fn api_error(status: u16) -> ClientError {
        ClientError::Api {
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            body: "upstream failed".to_string(),
        }
    }

    /// In-memory utility provider. `Err(status)` fields fail with that
    /// upstream status.
    pub(crate) struct FakeUtility {
        pub customer: Result<Customer, u16>,
        pub bills: Result<Vec<Bill>, u16>,
        pub intervals: Result<CustomerIntervals, u16>,
    }

    impl FakeUtility {
        pub(crate) fn new(customer_id: i64) -> Self {
            Self {
                customer: Ok(serde_json::from_value(json!({
                    "id": customer_id,
                    "onboarding_link": format!("https://staging.bayou.energy/onboard/{customer_id}"),
                }))
                .unwrap()),
                bills: Ok(Vec::new()),
                intervals: Ok(serde_json::from_value(json!({
                    "meters": [{"id": "m1", "intervals": [
                        {"start": "2024-01-01T00:00:00Z", "end": "2024-01-01T00:15:00Z",
                         "net_electricity_consumption": 0.4}
                    ]}]
                }))
                .unwrap()),
            }
        }

        pub(crate) fn with_bills(mut self, bills: Vec<Bill>) -> Self {
            self.bills = Ok(bills);
            self
        }
    }

    #[async_trait]
    impl UtilityProvider for FakeUtility {
        async fn create_customer(&self) -> Result<Customer, ClientError> {
            self.customer.clone().map_err(api_error)
        }

        async fn get_customer_bills(&self, _: CustomerId) -> Result<Vec<Bill>, ClientError> {
            self.bills.clone().map_err(api_error)
        }

        async fn get_customer_intervals(
            &self,
            _: CustomerId,
        ) -> Result<CustomerIntervals, ClientError> {
            self.intervals.clone().map_err(api_error)
        }
    }
}
