//! Palmetto energy intelligence API configuration.

use url::Url;

#[derive(Debug, Clone)]
pub struct PalmettoConfig {
    pub base_url: Url,
    /// Bearer token.
    pub api_key: String,
}
