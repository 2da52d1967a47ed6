//! Billing domain - subscription lifecycle driven by payment-provider events.
//!
//! - `webhook_verifier`: authenticates the raw webhook body
//! - `billing_event`: decodes verified envelopes into a closed event set
//! - `status` / `tier`: subscription state machine and derived entitlement
//! - `write_plan`: ordered persistence steps for a single transition

mod billing_event;
mod status;
mod stripe_event;
mod subscription;
mod tier;
mod webhook_errors;
mod webhook_verifier;
mod write_plan;

pub use billing_event::{
    BillingEvent, CheckoutCompleted, PaymentFailed, SubscriptionChanged,
    CHECKOUT_SESSION_COMPLETED, CUSTOMER_SUBSCRIPTION_DELETED, CUSTOMER_SUBSCRIPTION_UPDATED,
    INVOICE_PAYMENT_FAILED, USER_ID_METADATA_KEY,
};
pub use status::{is_nominal_transition, SubscriptionStatus};
pub use stripe_event::{
    CheckoutSessionObject, ExpandableId, InvoiceObject, PriceObject, StripeEvent,
    StripeEventData, SubscriptionItem, SubscriptionItemList, SubscriptionObject,
};
pub use subscription::{SubscriptionRecord, DEFAULT_PLAN};
pub use tier::EntitlementTier;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS};
pub use write_plan::{WritePlan, WriteStep};
