pub mod credentials;
pub mod customer;
pub mod forecast;
pub mod onboarding;
pub mod webhook;

pub use credentials::{CredentialCheckRequest, CredentialCheckResponse, CredentialRecordView};
pub use customer::{Bill, CreateCustomer, Customer, CustomerIntervals, Interval, Meter};
pub use forecast::{
    ConsumptionRecord, ConsumptionRequest, ConsumptionResponse, ConsumptionVariable,
    ForecastRequest, ForecastResponseRecord, Granularity, HvacInfo,
};
pub use onboarding::{OnboardingStage, OnboardingStatusResponse, SignInResponse};
pub use webhook::{CustomerId, EventName, WebhookAck, WebhookEvent, WebhookObject};

/// Error body returned by every failing API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
