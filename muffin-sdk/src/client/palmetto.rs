//! Palmetto energy intelligence API client.

use reqwest::Client;

use super::{ClientError, endpoint, parse_response};
use crate::config::PalmettoConfig;

#[derive(Debug, Clone)]
pub struct PalmettoClient {
    http: Client,
    config: PalmettoConfig,
}

impl PalmettoClient {
    pub fn new(config: PalmettoConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /health` – upstream health document, returned verbatim.
    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        let url = endpoint(&self.config.base_url, "health")?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        parse_response(resp).await
    }
}
