//! Runtime configuration re-exports.
//!
//! The validated config types live in `muffin-sdk::config` (upstream
//! connections) and `muffin-core::config` (onboarding).

pub use muffin_core::config::OnboardingConfig;
pub use muffin_sdk::config::{BayouConfig, ForecastConfig, PalmettoConfig, ServerConfig};
