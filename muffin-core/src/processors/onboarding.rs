//! Onboarding orchestrator.
//!
//! Drives a freshly created customer through
//! `CustomerCreated -> CredentialsFilled -> BillsReady -> IntervalsReady -> Done`.
//! Every transition is gated on a correlated webhook wait; the first failure
//! aborts the flow.
//!
//! Each wait is registered before the step that precedes it finishes, so a
//! webhook that arrives early (for example `intervals_ready` during the
//! inspection delay) still settles it.

use std::sync::Arc;
use std::time::Duration;

use muffin_sdk::client::ClientError;
use muffin_sdk::objects::{Bill, Customer, CustomerId, CustomerIntervals, OnboardingStage};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::OnboardingConfig;
use crate::events::{EventName, EventWaiter, PendingWait, WaitError};
use crate::provider::UtilityProvider;

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("utility provider error: {0}")]
    Provider(#[from] ClientError),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

/// Data collected by a completed onboarding.
#[derive(Debug, Clone)]
pub struct OnboardingOutcome {
    pub customer_id: CustomerId,
    pub bills: Vec<Bill>,
    pub intervals: CustomerIntervals,
}

#[derive(Clone)]
pub struct Onboarding {
    provider: Arc<dyn UtilityProvider>,
    waiter: EventWaiter,
    inspection_delay: Duration,
}

impl Onboarding {
    pub fn new(
        provider: Arc<dyn UtilityProvider>,
        waiter: EventWaiter,
        config: &OnboardingConfig,
    ) -> Self {
        Self {
            provider,
            waiter,
            inspection_delay: config.inspection_delay,
        }
    }

    /// Create the customer and start listening for its credentials.
    ///
    /// The returned run has not progressed past `CustomerCreated`; call
    /// [`OnboardingRun::run`] to drive it.
    pub async fn start(&self) -> Result<OnboardingRun, OnboardingError> {
        let customer = self.provider.create_customer().await?;
        info!(customer_id = %customer.id, "Created customer, waiting for credentials");

        let credentials = self
            .waiter
            .register(EventName::CustomerHasFilledCredentials, customer.id);
        let (stage_tx, _) = watch::channel(OnboardingStage::CustomerCreated);

        Ok(OnboardingRun {
            customer,
            provider: Arc::clone(&self.provider),
            waiter: self.waiter.clone(),
            inspection_delay: self.inspection_delay,
            credentials,
            stage_tx,
        })
    }
}

/// A started onboarding flow.
pub struct OnboardingRun {
    customer: Customer,
    provider: Arc<dyn UtilityProvider>,
    waiter: EventWaiter,
    inspection_delay: Duration,
    credentials: PendingWait,
    stage_tx: watch::Sender<OnboardingStage>,
}

impl OnboardingRun {
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer.id
    }

    /// Observe stage changes. The channel closes when the run finishes.
    pub fn stages(&self) -> watch::Receiver<OnboardingStage> {
        self.stage_tx.subscribe()
    }

    pub async fn run(self) -> Result<OnboardingOutcome, OnboardingError> {
        let OnboardingRun {
            customer,
            provider,
            waiter,
            inspection_delay,
            credentials,
            stage_tx,
        } = self;
        let flow = Flow {
            customer_id: customer.id,
            provider,
            waiter,
            inspection_delay,
            stage_tx,
        };

        let result = flow.drive(credentials).await;
        if let Err(err) = &result {
            let stage = *flow.stage_tx.borrow();
            warn!(
                customer_id = %flow.customer_id,
                %stage,
                error = %err,
                "Onboarding aborted"
            );
        }
        result
    }
}

struct Flow {
    customer_id: CustomerId,
    provider: Arc<dyn UtilityProvider>,
    waiter: EventWaiter,
    inspection_delay: Duration,
    stage_tx: watch::Sender<OnboardingStage>,
}

impl Flow {
    fn advance(&self, stage: OnboardingStage) {
        info!(customer_id = %self.customer_id, %stage, "Onboarding advanced");
        self.stage_tx.send_replace(stage);
    }

    async fn drive(&self, credentials: PendingWait) -> Result<OnboardingOutcome, OnboardingError> {
        let customer_id = self.customer_id;

        credentials.wait().await?;
        let bills_ready = self.waiter.register(EventName::BillsReady, customer_id);
        self.advance(OnboardingStage::CredentialsFilled);

        bills_ready.wait().await?;
        let intervals_ready = self.waiter.register(EventName::IntervalsReady, customer_id);
        let bills = self.provider.get_customer_bills(customer_id).await?;
        info!(%customer_id, bills = bills.len(), "Retrieved bills");
        self.advance(OnboardingStage::BillsReady);

        if !self.inspection_delay.is_zero() {
            tokio::time::sleep(self.inspection_delay).await;
        }

        intervals_ready.wait().await?;
        let intervals = self.provider.get_customer_intervals(customer_id).await?;
        info!(
            %customer_id,
            intervals = intervals.interval_count(),
            "Retrieved intervals"
        );
        self.advance(OnboardingStage::IntervalsReady);

        self.advance(OnboardingStage::Done);
        Ok(OnboardingOutcome {
            customer_id,
            bills,
            intervals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, WebhookEvent};
    use crate::provider::testing::FakeUtility;

    fn onboarding(bus: &EventBus, provider: FakeUtility, inspection_delay: Duration) -> Onboarding {
        let config = OnboardingConfig {
            wait_timeout: Duration::from_secs(300),
            inspection_delay,
        };
        Onboarding::new(
            Arc::new(provider),
            EventWaiter::new(bus.clone(), config.wait_timeout),
            &config,
        )
    }

    fn publish(bus: &EventBus, name: EventName, id: i64) {
        bus.publish(&WebhookEvent::new(name, CustomerId(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_driven_by_webhooks() {
        let bus = EventBus::new();
        let onboarding = onboarding(&bus, FakeUtility::new(42), Duration::from_secs(5));

        let run = onboarding.start().await.unwrap();
        assert_eq!(run.customer_id(), CustomerId(42));
        let mut stages = run.stages();
        assert_eq!(*stages.borrow(), OnboardingStage::CustomerCreated);

        // Delivered before anyone awaits the run.
        publish(&bus, EventName::CustomerHasFilledCredentials, 42);
        let handle = tokio::spawn(run.run());

        stages
            .wait_for(|s| *s == OnboardingStage::CredentialsFilled)
            .await
            .unwrap();
        publish(&bus, EventName::BillsReady, 99);
        publish(&bus, EventName::BillsReady, 42);

        stages
            .wait_for(|s| *s == OnboardingStage::BillsReady)
            .await
            .unwrap();
        // Arrives during the inspection delay.
        publish(&bus, EventName::IntervalsReady, 42);

        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.customer_id, CustomerId(42));
        assert_eq!(outcome.intervals.interval_count(), 1);
        assert_eq!(bus.listener_count(&EventName::IntervalsReady), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_aborts_flow() {
        let bus = EventBus::new();
        let onboarding = onboarding(&bus, FakeUtility::new(7), Duration::ZERO);

        let run = onboarding.start().await.unwrap();
        let stages = run.stages();
        publish(&bus, EventName::CustomerHasFilledCredentials, 7);

        let err = run.run().await.unwrap_err();
        match err {
            OnboardingError::Wait(WaitError::Timeout { event, customer_id, .. }) => {
                assert_eq!(event, EventName::BillsReady);
                assert_eq!(customer_id, CustomerId(7));
            }
            other => panic!("expected bills_ready timeout, got {other:?}"),
        }
        assert_eq!(*stages.borrow(), OnboardingStage::CredentialsFilled);
        assert_eq!(bus.listener_count(&EventName::BillsReady), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_creation_failure() {
        let bus = EventBus::new();
        let mut provider = FakeUtility::new(1);
        provider.customer = Err(401);

        let result = onboarding(&bus, provider, Duration::ZERO).start().await;
        assert!(matches!(result, Err(OnboardingError::Provider(_))));
        assert_eq!(
            bus.listener_count(&EventName::CustomerHasFilledCredentials),
            0
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bill_fetch_failure_aborts() {
        let bus = EventBus::new();
        let mut provider = FakeUtility::new(3);
        provider.bills = Err(500);
        let run = onboarding(&bus, provider, Duration::ZERO).start().await.unwrap();

        let mut stages = run.stages();
        publish(&bus, EventName::CustomerHasFilledCredentials, 3);
        let handle = tokio::spawn(run.run());
        stages
            .wait_for(|s| *s == OnboardingStage::CredentialsFilled)
            .await
            .unwrap();
        publish(&bus, EventName::BillsReady, 3);

        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, OnboardingError::Provider(ClientError::Api { .. })));
        // The intervals wait registered ahead of the fetch is released.
        assert_eq!(bus.listener_count(&EventName::IntervalsReady), 0);
    }
}
