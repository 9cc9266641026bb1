//! TOML file configuration structures.
//!
//! These structs directly map to the `muffin-config.toml` file format. Every
//! section is optional; omitted values fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_BAYOU_BASE_URL: &str = "https://staging.bayou.energy/api/v2";
pub const DEFAULT_UTILITY: &str = "speculoos_power";
pub const DEFAULT_PALMETTO_BASE_URL: &str = "https://ei.palmetto.com/api/v0";
pub const DEFAULT_SERVICE_ADDRESS: &str = "3048 Partridge Ave, Oakland, CA 94605";

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bayou: BayouConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub palmetto: PalmettoConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:3000").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

/// Utility data provider section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayouConfig {
    #[serde(default = "default_bayou_base_url")]
    pub base_url: String,
    /// Overridden by `BAYOU_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_utility")]
    pub utility: String,
}

fn default_bayou_base_url() -> String {
    DEFAULT_BAYOU_BASE_URL.to_string()
}

fn default_utility() -> String {
    DEFAULT_UTILITY.to_string()
}

impl Default for BayouConfig {
    fn default() -> Self {
        Self {
            base_url: default_bayou_base_url(),
            api_key: String::new(),
            utility: default_utility(),
        }
    }
}

/// Forecasting data API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Overridden by `DATA_API_URL`. Required.
    #[serde(default)]
    pub data_api_url: Option<String>,
    #[serde(default = "default_service_address")]
    pub address: String,
}

fn default_service_address() -> String {
    DEFAULT_SERVICE_ADDRESS.to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_api_url: None,
            address: default_service_address(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalmettoConfig {
    #[serde(default = "default_palmetto_base_url")]
    pub base_url: String,
    /// Overridden by `PALMETTO_API_KEY`.
    #[serde(default)]
    pub api_key: String,
}

fn default_palmetto_base_url() -> String {
    DEFAULT_PALMETTO_BASE_URL.to_string()
}

impl Default for PalmettoConfig {
    fn default() -> Self {
        Self {
            base_url: default_palmetto_base_url(),
            api_key: String::new(),
        }
    }
}

/// Onboarding flow section. Durations are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default)]
    pub inspection_delay_secs: u64,
}

fn default_wait_timeout_secs() -> u64 {
    muffin_core::config::DEFAULT_WAIT_TIMEOUT.as_secs()
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            inspection_delay_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:4000"

[bayou]
base_url = "https://bayou.energy/api/v2"
api_key = "bayou-key"
utility = "pacific_gas"

[forecast]
data_api_url = "http://localhost:8000"

[palmetto]
api_key = "palmetto-key"

[onboarding]
wait_timeout_secs = 120
inspection_delay_secs = 10
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 4000);
        assert_eq!(config.bayou.utility, "pacific_gas");
        assert_eq!(
            config.forecast.data_api_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.forecast.address, DEFAULT_SERVICE_ADDRESS);
        assert_eq!(config.palmetto.base_url, DEFAULT_PALMETTO_BASE_URL);
        assert_eq!(config.onboarding.inspection_delay_secs, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.bayou.base_url, DEFAULT_BAYOU_BASE_URL);
        assert_eq!(config.bayou.utility, DEFAULT_UTILITY);
        assert!(config.bayou.api_key.is_empty());
        assert_eq!(config.forecast.data_api_url, None);
        assert_eq!(config.onboarding.wait_timeout_secs, 300);
        assert_eq!(config.onboarding.inspection_delay_secs, 0);
    }
}
