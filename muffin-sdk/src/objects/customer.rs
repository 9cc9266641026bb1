//! Utility data provider resource types (customers, bills, intervals).
//!
//! Only the fields the backend interprets are typed; the rest of each
//! provider object is preserved in `extra` so it can be passed through to
//! API consumers unchanged.

use serde::{Deserialize, Serialize};

use super::webhook::CustomerId;

/// Request body for creating a provider customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub utility: String,
}

/// A provider customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Link the end user follows to enter their utility credentials.
    pub onboarding_link: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single utility bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    #[serde(default)]
    pub billing_period_from: Option<String>,
    #[serde(default)]
    pub billing_period_to: Option<String>,
    /// kWh
    #[serde(default)]
    pub electricity_consumption: Option<f64>,
    /// therms
    #[serde(default)]
    pub gas_consumption: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Interval data for every meter of a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerIntervals {
    #[serde(default)]
    pub meters: Vec<Meter>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub id: serde_json::Value,
    #[serde(default)]
    pub intervals: Vec<Interval>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub net_electricity_consumption: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CustomerIntervals {
    /// Total number of intervals across all meters.
    pub fn interval_count(&self) -> usize {
        self.meters.iter().map(|m| m.intervals.len()).sum()
    }
}
