//! Utility data provider configuration.

use url::Url;

/// Connection settings for the Bayou API.
#[derive(Debug, Clone)]
pub struct BayouConfig {
    /// API root, e.g. `https://staging.bayou.energy/api/v2/`.
    pub base_url: Url,
    /// API key, sent as the basic-auth username.
    pub api_key: String,
    /// Utility code new customers are created for.
    pub utility: String,
}
