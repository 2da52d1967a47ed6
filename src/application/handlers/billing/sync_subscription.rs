//! SyncSubscriptionHandler - keeps subscription records and profile tiers in
//! step with payment-provider webhook events.
//!
//! One event produces at most one transition. Each transition is computed from
//! the event's own payload rather than diffed against stored state, so replays
//! and out-of-order deliveries converge on the provider's latest view.

use std::sync::Arc;

use crate::domain::billing::{
    is_nominal_transition, BillingEvent, CheckoutCompleted, EntitlementTier, StripeWebhookVerifier,
    SubscriptionRecord, SubscriptionStatus, WebhookError, WritePlan,
};
use crate::domain::foundation::{StateMachine, Timestamp, UserId};
use crate::ports::{PaymentProvider, SubscriptionStore};

/// Command carrying one webhook delivery exactly as received.
#[derive(Debug, Clone)]
pub struct SyncSubscriptionCommand {
    /// Raw request body.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value, if present.
    pub signature: Option<String>,
}

/// Transition applied for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSubscriptionResult {
    /// Checkout completed; record created or overwritten as active.
    Activated { user_id: UserId, plan: String },

    /// Existing record moved to a new status.
    StatusChanged {
        user_id: UserId,
        status: SubscriptionStatus,
        tier: EntitlementTier,
    },
}

/// Handler for subscription webhooks.
pub struct SyncSubscriptionHandler {
    verifier: StripeWebhookVerifier,
    store: Arc<dyn SubscriptionStore>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl SyncSubscriptionHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        store: Arc<dyn SubscriptionStore>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            verifier,
            store,
            payment_provider,
        }
    }

    /// Verifies, decodes and applies one delivery.
    ///
    /// Nothing reaches the store unless the signature verified.
    pub async fn handle(
        &self,
        cmd: SyncSubscriptionCommand,
    ) -> Result<SyncSubscriptionResult, WebhookError> {
        let signature = cmd.signature.as_deref().ok_or(WebhookError::InvalidSignature)?;

        let envelope = match self.verifier.verify_and_parse(&cmd.payload, signature) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(error = %err, "Rejected webhook delivery");
                return Err(err);
            }
        };

        let result = match BillingEvent::from_envelope(&envelope) {
            Ok(event) => self.apply(event).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(outcome) => {
                tracing::info!(event_id = %envelope.id, event_type = %envelope.event_type, outcome = ?outcome, "Billing event applied");
            }
            Err(err) if err.is_acknowledged() => {
                tracing::info!(event_id = %envelope.id, event_type = %envelope.event_type, reason = %err, "Billing event acknowledged without changes");
            }
            Err(err) => {
                tracing::error!(event_id = %envelope.id, event_type = %envelope.event_type, error = %err, "Billing event failed");
            }
        }
        result
    }

    /// Applies an already verified event.
    pub async fn apply(&self, event: BillingEvent) -> Result<SyncSubscriptionResult, WebhookError> {
        match event {
            BillingEvent::CheckoutCompleted(checkout) => self.on_checkout_completed(checkout).await,
            BillingEvent::SubscriptionUpdated(changed) => {
                let status = SubscriptionStatus::from_provider(&changed.provider_status);
                self.transition(&changed.customer_id, status, changed.period_end)
                    .await
            }
            BillingEvent::SubscriptionDeleted(changed) => {
                self.transition(&changed.customer_id, SubscriptionStatus::Canceled, None)
                    .await
            }
            BillingEvent::InvoicePaymentFailed(failed) => {
                self.transition(&failed.customer_id, SubscriptionStatus::PastDue, None)
                    .await
            }
            BillingEvent::Unhandled { event_type } => {
                Err(WebhookError::UnhandledEventKind(event_type))
            }
        }
    }

    async fn on_checkout_completed(
        &self,
        checkout: CheckoutCompleted,
    ) -> Result<SyncSubscriptionResult, WebhookError> {
        if !checkout.is_subscription_mode() {
            return Err(WebhookError::UnhandledEventKind(format!(
                "checkout.session.completed in {} mode",
                checkout.mode.as_deref().unwrap_or("unknown")
            )));
        }

        let user_id = checkout.user_id.ok_or(WebhookError::MissingUserReference)?;
        let subscription_id = checkout.subscription_id.ok_or_else(|| {
            WebhookError::IncompleteEvent("subscription checkout without subscription id".to_string())
        })?;

        let subscription = self
            .payment_provider
            .get_subscription(&subscription_id)
            .await
            .map_err(|e| WebhookError::ProviderFailure(e.to_string()))?
            .ok_or_else(|| {
                WebhookError::ProviderFailure(format!("subscription {} not found", subscription_id))
            })?;

        let customer_id = checkout
            .customer_id
            .unwrap_or_else(|| subscription.customer_id.clone());
        let record = SubscriptionRecord::activated(
            user_id.clone(),
            customer_id,
            subscription.id,
            subscription.lookup_key.as_deref(),
            subscription.period_end.and_then(Timestamp::from_unix_secs),
        );
        let plan_name = record.plan.clone();

        let previous = self.store.find_by_user_id(&user_id).await?;
        self.report_transition(&user_id, previous.map(|r| r.status), SubscriptionStatus::Active);

        self.store.apply(&WritePlan::activate(record)).await?;

        Ok(SyncSubscriptionResult::Activated {
            user_id,
            plan: plan_name,
        })
    }

    async fn transition(
        &self,
        customer_id: &str,
        status: SubscriptionStatus,
        period_end: Option<i64>,
    ) -> Result<SyncSubscriptionResult, WebhookError> {
        let record = self
            .store
            .find_by_customer_id(customer_id)
            .await?
            .ok_or_else(|| WebhookError::NoMatchingSubscription {
                customer_id: customer_id.to_string(),
            })?;

        self.report_transition(&record.user_id, Some(record.status), status);

        let plan = WritePlan::status_change(
            record.user_id.clone(),
            status,
            period_end.and_then(Timestamp::from_unix_secs),
        );
        self.store.apply(&plan).await?;

        Ok(SyncSubscriptionResult::StatusChanged {
            user_id: record.user_id,
            status: plan.final_status(),
            tier: plan.final_tier(),
        })
    }

    fn report_transition(
        &self,
        user_id: &UserId,
        current: Option<SubscriptionStatus>,
        target: SubscriptionStatus,
    ) {
        if !is_nominal_transition(current, target) {
            tracing::warn!(
                user_id = %user_id,
                from = ?current,
                to = %target,
                expected = ?current.map(|s| s.valid_transitions()),
                "Applying out-of-order subscription transition"
            );
        }
    }
}
