//! Closed set of provider events the sync engine reacts to.
//!
//! Decoding happens once, right after verification. Event kinds outside the
//! known set become `BillingEvent::Unhandled`, so adding a kind means adding a
//! variant and every `match` over this type has to handle it.

use super::stripe_event::{CheckoutSessionObject, InvoiceObject, StripeEvent, SubscriptionObject};
use super::webhook_errors::WebhookError;
use crate::domain::foundation::UserId;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const CUSTOMER_SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const CUSTOMER_SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";

/// Checkout metadata key carrying the internal user id.
pub const USER_ID_METADATA_KEY: &str = "userId";

/// Checkout session mode that creates a subscription.
const SUBSCRIPTION_MODE: &str = "subscription";

/// A verified, decoded provider event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    CheckoutCompleted(CheckoutCompleted),
    SubscriptionUpdated(SubscriptionChanged),
    SubscriptionDeleted(SubscriptionChanged),
    InvoicePaymentFailed(PaymentFailed),
    Unhandled { event_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCompleted {
    pub session_id: String,
    pub mode: Option<String>,
    pub user_id: Option<UserId>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

impl CheckoutCompleted {
    pub fn is_subscription_mode(&self) -> bool {
        self.mode.as_deref() == Some(SUBSCRIPTION_MODE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionChanged {
    pub subscription_id: String,
    pub customer_id: String,
    /// Raw provider status, mapped by `SubscriptionStatus::from_provider`.
    pub provider_status: String,
    pub period_end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFailed {
    pub invoice_id: String,
    pub customer_id: String,
}

impl BillingEvent {
    /// Decodes the envelope's data object according to its type.
    ///
    /// # Errors
    ///
    /// `IncompleteEvent` when a known event kind carries an object that lacks
    /// the fields its transition needs. Callers acknowledge it, since
    /// redelivering the same payload can never succeed.
    pub fn from_envelope(event: &StripeEvent) -> Result<Self, WebhookError> {
        match event.event_type.as_str() {
            CHECKOUT_SESSION_COMPLETED => {
                let session: CheckoutSessionObject = decode(event)?;
                let user_id = session
                    .metadata_value(USER_ID_METADATA_KEY)
                    .and_then(|id| UserId::new(id).ok());
                Ok(BillingEvent::CheckoutCompleted(CheckoutCompleted {
                    session_id: session.id,
                    mode: session.mode,
                    user_id,
                    customer_id: session.customer.map(|c| c.id().to_string()),
                    subscription_id: session.subscription.map(|s| s.id().to_string()),
                }))
            }
            CUSTOMER_SUBSCRIPTION_UPDATED => {
                Ok(BillingEvent::SubscriptionUpdated(subscription_changed(event)?))
            }
            CUSTOMER_SUBSCRIPTION_DELETED => {
                Ok(BillingEvent::SubscriptionDeleted(subscription_changed(event)?))
            }
            INVOICE_PAYMENT_FAILED => {
                let invoice: InvoiceObject = decode(event)?;
                let customer_id = invoice
                    .customer
                    .map(|c| c.id().to_string())
                    .ok_or_else(|| WebhookError::IncompleteEvent("invoice without customer".to_string()))?;
                Ok(BillingEvent::InvoicePaymentFailed(PaymentFailed {
                    invoice_id: invoice.id,
                    customer_id,
                }))
            }
            other => Ok(BillingEvent::Unhandled {
                event_type: other.to_string(),
            }),
        }
    }

    /// Provider event type this variant was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            BillingEvent::CheckoutCompleted(_) => CHECKOUT_SESSION_COMPLETED,
            BillingEvent::SubscriptionUpdated(_) => CUSTOMER_SUBSCRIPTION_UPDATED,
            BillingEvent::SubscriptionDeleted(_) => CUSTOMER_SUBSCRIPTION_DELETED,
            BillingEvent::InvoicePaymentFailed(_) => INVOICE_PAYMENT_FAILED,
            BillingEvent::Unhandled { event_type } => event_type,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> Result<T, WebhookError> {
    event.deserialize_object().map_err(|e| {
        WebhookError::IncompleteEvent(format!("{} object: {}", event.event_type, e))
    })
}

fn subscription_changed(event: &StripeEvent) -> Result<SubscriptionChanged, WebhookError> {
    let subscription: SubscriptionObject = decode(event)?;
    Ok(SubscriptionChanged {
        period_end: subscription.period_end(),
        subscription_id: subscription.id,
        customer_id: subscription.customer.id().to_string(),
        provider_status: subscription.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::stripe_event::StripeEventBuilder;
    use serde_json::json;

    #[test]
    fn decodes_subscription_checkout() {
        let event = StripeEventBuilder::new(CHECKOUT_SESSION_COMPLETED)
            .object(json!({
                "id": "cs_1",
                "mode": "subscription",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": { "userId": "u1" }
            }))
            .build();

        let BillingEvent::CheckoutCompleted(checkout) = BillingEvent::from_envelope(&event).unwrap()
        else {
            panic!("expected checkout");
        };
        assert!(checkout.is_subscription_mode());
        assert_eq!(checkout.user_id, Some(UserId::new("u1").unwrap()));
        assert_eq!(checkout.customer_id.as_deref(), Some("cus_1"));
        assert_eq!(checkout.subscription_id.as_deref(), Some("sub_1"));
    }

    #[test]
    fn checkout_without_metadata_has_no_user() {
        let event = StripeEventBuilder::new(CHECKOUT_SESSION_COMPLETED)
            .object(json!({ "id": "cs_1", "mode": "subscription" }))
            .build();

        let BillingEvent::CheckoutCompleted(checkout) = BillingEvent::from_envelope(&event).unwrap()
        else {
            panic!("expected checkout");
        };
        assert!(checkout.user_id.is_none());
    }

    #[test]
    fn payment_mode_checkout_is_not_subscription_mode() {
        let event = StripeEventBuilder::new(CHECKOUT_SESSION_COMPLETED)
            .object(json!({ "id": "cs_1", "mode": "payment", "metadata": { "userId": "u1" } }))
            .build();

        let BillingEvent::CheckoutCompleted(checkout) = BillingEvent::from_envelope(&event).unwrap()
        else {
            panic!("expected checkout");
        };
        assert!(!checkout.is_subscription_mode());
    }

    #[test]
    fn decodes_subscription_update() {
        let event = StripeEventBuilder::new(CUSTOMER_SUBSCRIPTION_UPDATED)
            .object(json!({
                "id": "sub_1",
                "customer": "cus_1",
                "status": "past_due",
                "current_period_end": 1706745600
            }))
            .build();

        assert_eq!(
            BillingEvent::from_envelope(&event).unwrap(),
            BillingEvent::SubscriptionUpdated(SubscriptionChanged {
                subscription_id: "sub_1".to_string(),
                customer_id: "cus_1".to_string(),
                provider_status: "past_due".to_string(),
                period_end: Some(1706745600),
            })
        );
    }

    #[test]
    fn subscription_event_without_customer_is_incomplete() {
        let event = StripeEventBuilder::new(CUSTOMER_SUBSCRIPTION_DELETED)
            .object(json!({ "id": "sub_1", "status": "canceled" }))
            .build();

        assert!(matches!(
            BillingEvent::from_envelope(&event),
            Err(WebhookError::IncompleteEvent(_))
        ));
    }

    #[test]
    fn decodes_invoice_failure() {
        let event = StripeEventBuilder::new(INVOICE_PAYMENT_FAILED)
            .object(json!({ "id": "in_1", "customer": "cus_1", "subscription": "sub_1" }))
            .build();

        assert_eq!(
            BillingEvent::from_envelope(&event).unwrap(),
            BillingEvent::InvoicePaymentFailed(PaymentFailed {
                invoice_id: "in_1".to_string(),
                customer_id: "cus_1".to_string(),
            })
        );
    }

    #[test]
    fn invoice_without_customer_is_incomplete() {
        let event = StripeEventBuilder::new(INVOICE_PAYMENT_FAILED)
            .object(json!({ "id": "in_1", "customer": null }))
            .build();

        assert!(matches!(
            BillingEvent::from_envelope(&event),
            Err(WebhookError::IncompleteEvent(_))
        ));
    }

    #[test]
    fn unknown_kinds_are_unhandled() {
        let event = StripeEventBuilder::new("customer.created")
            .object(json!({ "anything": true }))
            .build();

        let decoded = BillingEvent::from_envelope(&event).unwrap();
        assert_eq!(decoded.kind(), "customer.created");
        assert!(matches!(decoded, BillingEvent::Unhandled { .. }));
    }
}
