//! Request-scoped and background processors built on the provider seams.

pub mod history;
pub mod onboarding;
pub mod onboarding_tracker;

pub use history::{
    BillHistoryQuery, ConsumptionHistory, ForecastPipeline, ForecastQuery, HistoryError,
    THERMS_TO_KWH,
};
pub use onboarding::{Onboarding, OnboardingError, OnboardingOutcome, OnboardingRun};
pub use onboarding_tracker::{OnboardingStatus, OnboardingTracker};
