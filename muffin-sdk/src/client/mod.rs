//! HTTP clients for the upstream APIs.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod bayou;
mod forecast;
mod palmetto;

pub use bayou::BayouClient;
pub use forecast::ForecastClient;
pub use palmetto::PalmettoClient;

use reqwest::StatusCode;
use url::Url;

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Resolve `path` below `base`, keeping every segment of `base`.
///
/// `Url::join` replaces the last segment unless the base ends with `/`.
fn endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://staging.bayou.energy/api/v2").unwrap();
        let url = endpoint(&base, "customers/42/bills").unwrap();
        assert_eq!(url.as_str(), "https://staging.bayou.energy/api/v2/customers/42/bills");

        let base = Url::parse("https://ei.palmetto.com/api/v0/").unwrap();
        let url = endpoint(&base, "/health").unwrap();
        assert_eq!(url.as_str(), "https://ei.palmetto.com/api/v0/health");
    }
}
