//! HTTP adapter for billing.

mod dto;
mod handlers;
mod routes;

pub use dto::{SubscriptionResponse, WebhookReceivedResponse};
pub use handlers::{BillingAppState, SIGNATURE_HEADER};
pub use routes::billing_router;
