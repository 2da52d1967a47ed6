//! HTTP DTOs for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::SubscriptionView;

/// Acknowledgement returned for every accepted webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReceivedResponse {
    pub received: bool,
}

impl WebhookReceivedResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Subscription state for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub user_id: String,
    pub status: String,
    pub plan: String,
    pub tier: String,
    /// RFC 3339, absent when the provider never reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<String>,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        let record = view.record;
        Self {
            user_id: record.user_id.to_string(),
            status: record.status.as_str().to_string(),
            plan: record.plan,
            tier: view.tier.as_str().to_string(),
            current_period_end: record.period_end.map(|t| t.as_datetime().to_rfc3339()),
            stripe_customer_id: record.customer_id,
            stripe_subscription_id: record.subscription_id,
        }
    }
}
