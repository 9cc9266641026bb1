//! Onboarding configuration.

use std::time::Duration;

/// How long a correlated wait may stay pending before it fails.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Settings for the onboarding orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Timeout applied to every correlated webhook wait.
    pub wait_timeout: Duration,
    /// Pause inserted after bills are fetched and before intervals are
    /// awaited, so the retrieved bills can be inspected upstream.
    pub inspection_delay: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            inspection_delay: Duration::ZERO,
        }
    }
}
