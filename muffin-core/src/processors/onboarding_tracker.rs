//! Per-customer onboarding progress for runs started in the background.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use muffin_sdk::objects::{CustomerId, OnboardingStage};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::onboarding::OnboardingRun;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingStatus {
    /// Last stage reached.
    pub stage: OnboardingStage,
    /// Why the run stopped after `stage`, if it failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OnboardingTracker {
    statuses: Arc<RwLock<HashMap<CustomerId, OnboardingStatus>>>,
}

impl OnboardingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, customer_id: CustomerId) -> Option<OnboardingStatus> {
        self.statuses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&customer_id)
            .cloned()
    }

    fn update(&self, customer_id: CustomerId, f: impl FnOnce(&mut OnboardingStatus)) {
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        let status = statuses.entry(customer_id).or_insert(OnboardingStatus {
            stage: OnboardingStage::CustomerCreated,
            error: None,
        });
        f(status);
    }

    /// Drive `run` on a background task, recording every stage it reaches
    /// and the final error, if any.
    pub fn spawn(&self, run: OnboardingRun) -> JoinHandle<()> {
        let customer_id = run.customer_id();
        let mut stages = run.stages();
        let initial = *stages.borrow_and_update();
        self.update(customer_id, |status| {
            status.stage = initial;
            status.error = None;
        });

        let tracker = self.clone();
        tokio::spawn(async move {
            let forward = {
                let tracker = tracker.clone();
                tokio::spawn(async move {
                    // Ends once the run drops its stage sender.
                    while stages.changed().await.is_ok() {
                        let stage = *stages.borrow_and_update();
                        tracker.update(customer_id, |status| status.stage = stage);
                    }
                })
            };

            let result = run.run().await;
            let _ = forward.await;

            match result {
                Ok(outcome) => info!(
                    %customer_id,
                    bills = outcome.bills.len(),
                    intervals = outcome.intervals.interval_count(),
                    "Onboarding complete"
                ),
                Err(err) => {
                    warn!(%customer_id, error = %err, "Onboarding failed");
                    tracker.update(customer_id, |status| status.error = Some(err.to_string()));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OnboardingConfig;
    use crate::events::{EventBus, EventName, EventWaiter, WebhookEvent};
    use crate::processors::onboarding::Onboarding;
    use crate::provider::testing::FakeUtility;

    fn onboarding(bus: &EventBus, customer_id: i64) -> Onboarding {
        let config = OnboardingConfig::default();
        Onboarding::new(
            Arc::new(FakeUtility::new(customer_id)),
            EventWaiter::new(bus.clone(), config.wait_timeout),
            &config,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracks_completed_run() {
        let bus = EventBus::new();
        let tracker = OnboardingTracker::new();
        let run = onboarding(&bus, 42).start().await.unwrap();
        let mut stages = run.stages();

        let handle = tracker.spawn(run);
        assert_eq!(
            tracker.get(CustomerId(42)).unwrap().stage,
            OnboardingStage::CustomerCreated
        );

        for name in [
            EventName::CustomerHasFilledCredentials,
            EventName::BillsReady,
            EventName::IntervalsReady,
        ] {
            bus.publish(&WebhookEvent::new(name, CustomerId(42)));
            stages.changed().await.unwrap();
        }
        handle.await.unwrap();

        assert_eq!(
            tracker.get(CustomerId(42)),
            Some(OnboardingStatus {
                stage: OnboardingStage::Done,
                error: None,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_failure() {
        let bus = EventBus::new();
        let tracker = OnboardingTracker::new();
        let run = onboarding(&bus, 5).start().await.unwrap();

        tracker.spawn(run).await.unwrap();

        let status = tracker.get(CustomerId(5)).unwrap();
        assert_eq!(status.stage, OnboardingStage::CustomerCreated);
        assert!(status.error.unwrap().contains("timed out"));
    }

    #[test]
    fn test_unknown_customer() {
        assert_eq!(OnboardingTracker::new().get(CustomerId(1)), None);
    }
}
