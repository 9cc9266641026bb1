//! Bayou utility data API client.
//!
//! Authenticates with HTTP basic auth, the API key being the username and
//! the password left empty.

use reqwest::Client;

use super::{ClientError, endpoint, parse_response};
use crate::config::BayouConfig;
use crate::objects::customer::{Bill, CreateCustomer, Customer, CustomerIntervals};
use crate::objects::webhook::CustomerId;

/// Typed HTTP client for the Bayou **v2** API.
#[derive(Debug, Clone)]
pub struct BayouClient {
    http: Client,
    config: BayouConfig,
}

impl BayouClient {
    pub fn new(config: BayouConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /customers` – create a customer for the configured utility.
    pub async fn create_customer(&self) -> Result<Customer, ClientError> {
        let url = endpoint(&self.config.base_url, "customers")?;

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.config.api_key, None::<&str>)
            .json(&CreateCustomer {
                utility: self.config.utility.clone(),
            })
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /customers/{id}/bills` – every bill retrieved for the customer.
    pub async fn get_customer_bills(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Bill>, ClientError> {
        let url = endpoint(&self.config.base_url, &format!("customers/{customer_id}/bills"))?;

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.config.api_key, None::<&str>)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /customers/{id}/intervals` – interval readings per meter.
    pub async fn get_customer_intervals(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerIntervals, ClientError> {
        let url = endpoint(
            &self.config.base_url,
            &format!("customers/{customer_id}/intervals"),
        )?;

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.config.api_key, None::<&str>)
            .send()
            .await?;

        parse_response(resp).await
    }
}
