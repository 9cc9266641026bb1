//! Configuration module for muffin-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments and
//! environment variables, then validates it into runtime types.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    BayouConfig, ForecastConfig, OnboardingConfig, PalmettoConfig, ServerConfig,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const BAYOU_API_KEY_ENV: &str = "BAYOU_API_KEY";
pub const PALMETTO_API_KEY_ENV: &str = "PALMETTO_API_KEY";
pub const DATA_API_URL_ENV: &str = "DATA_API_URL";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid url for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub bayou: BayouConfig,
    pub forecast: ForecastConfig,
    pub palmetto: PalmettoConfig,
    pub onboarding: OnboardingConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if it exists
    /// 2. Apply CLI and environment overrides
    /// 3. Validate and build the runtime configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with(|key| std::env::var(key).ok())
    }

    fn load_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults and environment"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        apply_env_overrides(&mut file_config, lookup);

        build_loaded_config(file_config)
    }
}

/// Overlay secrets and endpoints from the environment. Empty values are
/// ignored.
fn apply_env_overrides(config: &mut FileConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = non_empty(BAYOU_API_KEY_ENV) {
        config.bayou.api_key = key;
    }
    if let Some(key) = non_empty(PALMETTO_API_KEY_ENV) {
        config.palmetto.api_key = key;
    }
    if let Some(url) = non_empty(DATA_API_URL_ENV) {
        config.forecast.data_api_url = Some(url);
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { field, source })
}

fn build_loaded_config(file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
    let FileConfig {
        server,
        bayou,
        forecast,
        palmetto,
        onboarding,
    } = file_config;

    if bayou.utility.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "bayou.utility must not be empty".to_string(),
        ));
    }
    if bayou.api_key.is_empty() {
        tracing::warn!("No Bayou API key configured; customer requests will be rejected upstream");
    }
    if palmetto.api_key.is_empty() {
        tracing::warn!("No Palmetto API key configured");
    }

    let Some(data_api_url) = forecast.data_api_url.as_deref() else {
        return Err(ConfigError::ValidationError(format!(
            "forecast.data_api_url is not set (or set {DATA_API_URL_ENV})"
        )));
    };

    if onboarding.wait_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "onboarding.wait_timeout_secs must be greater than zero".to_string(),
        ));
    }
    if onboarding.inspection_delay_secs >= onboarding.wait_timeout_secs {
        return Err(ConfigError::ValidationError(format!(
            "onboarding.inspection_delay_secs ({}) must be shorter than wait_timeout_secs ({})",
            onboarding.inspection_delay_secs, onboarding.wait_timeout_secs
        )));
    }

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
        },
        bayou: BayouConfig {
            base_url: parse_url("bayou.base_url", &bayou.base_url)?,
            api_key: bayou.api_key,
            utility: bayou.utility,
        },
        forecast: ForecastConfig {
            data_api_url: parse_url("forecast.data_api_url", data_api_url)?,
            address: forecast.address,
        },
        palmetto: PalmettoConfig {
            base_url: parse_url("palmetto.base_url", &palmetto.base_url)?,
            api_key: palmetto.api_key,
        },
        onboarding: OnboardingConfig {
            wait_timeout: Duration::from_secs(onboarding.wait_timeout_secs),
            inspection_delay: Duration::from_secs(onboarding.inspection_delay_secs),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn with_data_api(mut config: FileConfig) -> FileConfig {
        config.forecast.data_api_url = Some("http://localhost:8000".to_string());
        config
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = FileConfig::default();
        config.bayou.api_key = "from-file".to_string();
        apply_env_overrides(
            &mut config,
            env(&[
                (BAYOU_API_KEY_ENV, "from-env"),
                (PALMETTO_API_KEY_ENV, "palmetto"),
                (DATA_API_URL_ENV, "https://data.example.com/v1"),
            ]),
        );

        assert_eq!(config.bayou.api_key, "from-env");
        assert_eq!(config.palmetto.api_key, "palmetto");
        assert_eq!(
            config.forecast.data_api_url.as_deref(),
            Some("https://data.example.com/v1")
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = FileConfig::default();
        config.bayou.api_key = "from-file".to_string();
        apply_env_overrides(&mut config, env(&[(BAYOU_API_KEY_ENV, "  ")]));
        assert_eq!(config.bayou.api_key, "from-file");
    }

    #[test]
    fn test_defaults_build() {
        let loaded = build_loaded_config(with_data_api(FileConfig::default())).unwrap();
        assert_eq!(
            loaded.bayou.base_url.as_str(),
            "https://staging.bayou.energy/api/v2"
        );
        assert_eq!(loaded.bayou.utility, "speculoos_power");
        assert_eq!(loaded.onboarding, OnboardingConfig::default());
    }

    #[test]
    fn test_missing_data_api_url_is_rejected() {
        let err = build_loaded_config(FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains(DATA_API_URL_ENV)));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut config = with_data_api(FileConfig::default());
        config.palmetto.base_url = "not a url".to_string();
        let err = build_loaded_config(config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                field: "palmetto.base_url",
                ..
            }
        ));
    }

    #[test]
    fn test_inspection_delay_must_fit_in_timeout() {
        let mut config = with_data_api(FileConfig::default());
        config.onboarding.wait_timeout_secs = 60;
        config.onboarding.inspection_delay_secs = 60;
        assert!(matches!(
            build_loaded_config(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loader = ConfigLoader::new(
            "/nonexistent/muffin-config.toml",
            Some("127.0.0.1:9999".parse().unwrap()),
        );
        let loaded = loader
            .load_with(env(&[(DATA_API_URL_ENV, "http://localhost:8000")]))
            .unwrap();
        assert_eq!(loaded.server.listen.port(), 9999);
        assert_eq!(loaded.bayou.base_url.as_str(), "https://staging.bayou.energy/api/v2");
        assert_eq!(loaded.forecast.data_api_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_missing_file_without_data_api_url_fails_validation() {
        let loader = ConfigLoader::new("/nonexistent/muffin-config.toml", None);
        assert!(matches!(
            loader.load_with(env(&[])),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
