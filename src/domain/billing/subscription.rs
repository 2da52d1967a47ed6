//! Per-user subscription record.

use serde::{Deserialize, Serialize};

use super::status::SubscriptionStatus;
use super::tier::EntitlementTier;
use crate::domain::foundation::{Timestamp, UserId};

/// Plan recorded when the provider price carries no lookup key.
pub const DEFAULT_PLAN: &str = "monthly";

/// Local mirror of a user's paid subscription. At most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub user_id: UserId,
    pub customer_id: String,
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub plan: String,
    pub period_end: Option<Timestamp>,
}

impl SubscriptionRecord {
    /// Builds the record written when a checkout completes.
    pub fn activated(
        user_id: UserId,
        customer_id: impl Into<String>,
        subscription_id: impl Into<String>,
        plan: Option<&str>,
        period_end: Option<Timestamp>,
    ) -> Self {
        Self {
            user_id,
            customer_id: customer_id.into(),
            subscription_id: subscription_id.into(),
            status: SubscriptionStatus::Active,
            plan: plan.unwrap_or(DEFAULT_PLAN).to_string(),
            period_end,
        }
    }

    /// Tier implied by this record's status.
    pub fn tier(&self) -> EntitlementTier {
        EntitlementTier::for_status(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    #[test]
    fn activated_record_is_active_and_premium() {
        let record = SubscriptionRecord::activated(user(), "cus_1", "sub_1", Some("yearly"), None);
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert_eq!(record.plan, "yearly");
        assert_eq!(record.tier(), EntitlementTier::Premium);
    }

    #[test]
    fn activated_record_defaults_plan() {
        let record = SubscriptionRecord::activated(user(), "cus_1", "sub_1", None, None);
        assert_eq!(record.plan, DEFAULT_PLAN);
    }
}
