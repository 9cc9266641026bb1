//! Application state shared across all request handlers.

use muffin_core::config::OnboardingConfig;
use muffin_core::events::{EventBus, EventWaiter};
use muffin_core::processors::{ConsumptionHistory, ForecastPipeline, Onboarding, OnboardingTracker};
use muffin_core::provider::{ForecastProvider, HealthProbe, UtilityProvider};
use muffin_core::store::CredentialStore;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Inbound webhook events are published here.
    pub bus: EventBus,
    /// Follows `customer_has_filled_credentials` on `bus`.
    pub credentials: CredentialStore,
    pub onboarding: Onboarding,
    pub tracker: OnboardingTracker,
    pub utility: Arc<dyn UtilityProvider>,
    pub history: ConsumptionHistory,
    pub forecast: ForecastPipeline,
    pub palmetto: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Wire the event bus, credential store and onboarding machinery around
    /// the given upstream providers.
    pub fn new(
        utility: Arc<dyn UtilityProvider>,
        forecast: Arc<dyn ForecastProvider>,
        palmetto: Arc<dyn HealthProbe>,
        onboarding: &OnboardingConfig,
    ) -> Self {
        let bus = EventBus::new();
        let credentials = CredentialStore::new();
        credentials.attach(&bus);

        let waiter = EventWaiter::new(bus.clone(), onboarding.wait_timeout);

        Self {
            onboarding: Onboarding::new(Arc::clone(&utility), waiter, onboarding),
            tracker: OnboardingTracker::new(),
            history: ConsumptionHistory::new(Arc::clone(&utility)),
            forecast: ForecastPipeline::new(Arc::clone(&utility), forecast),
            bus,
            credentials,
            utility,
            palmetto,
        }
    }
}
