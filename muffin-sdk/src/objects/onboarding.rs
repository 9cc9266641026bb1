//! Onboarding flow request and response types.

use serde::{Deserialize, Serialize};

use super::webhook::CustomerId;

/// Stage of a customer's onboarding.
///
/// Stages only move forward, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    CustomerCreated,
    CredentialsFilled,
    BillsReady,
    IntervalsReady,
    Done,
}

impl std::fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnboardingStage::CustomerCreated => write!(f, "customer_created"),
            OnboardingStage::CredentialsFilled => write!(f, "credentials_filled"),
            OnboardingStage::BillsReady => write!(f, "bills_ready"),
            OnboardingStage::IntervalsReady => write!(f, "intervals_ready"),
            OnboardingStage::Done => write!(f, "done"),
        }
    }
}

/// Response of `POST /api/bayou/signIn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub onboarding_link: String,
    pub customer_id: CustomerId,
    pub message: String,
}

/// Response of `GET /api/onboarding/{customer_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStatusResponse {
    pub customer_id: CustomerId,
    /// Last stage reached.
    pub stage: OnboardingStage,
    /// Set when the flow aborted after `stage`.
    pub error: Option<String>,
}
