//! Ordered persistence steps for one subscription transition.
//!
//! A transition touches the subscription row and the profile tier. Stores
//! that cannot apply both atomically apply the steps in order, and the order
//! is chosen so an observer between the two writes never sees a premium tier
//! next to a non-active status:
//!
//! - upgrade (status becomes active): subscription first, then tier
//! - downgrade (anything else): tier first, then subscription
//!
//! The window in between shows the conservative combination (active + free).

use super::status::SubscriptionStatus;
use super::subscription::SubscriptionRecord;
use super::tier::EntitlementTier;
use crate::domain::foundation::{Timestamp, UserId};

/// One persistence write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStep {
    /// Insert or overwrite the row keyed by `user_id`.
    UpsertSubscription(SubscriptionRecord),

    /// Change status (and period end, when known) of an existing row.
    UpdateSubscription {
        user_id: UserId,
        status: SubscriptionStatus,
        period_end: Option<Timestamp>,
    },

    /// Set the tier on the user's profile.
    SetTier { user_id: UserId, tier: EntitlementTier },
}

/// Ordered write steps for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    user_id: UserId,
    status: SubscriptionStatus,
    steps: Vec<WriteStep>,
}

impl WritePlan {
    /// Checkout completed: create or overwrite the record, then grant premium.
    pub fn activate(record: SubscriptionRecord) -> Self {
        let user_id = record.user_id.clone();
        let status = record.status;
        let tier = record.tier();
        let steps = vec![
            WriteStep::UpsertSubscription(record),
            WriteStep::SetTier {
                user_id: user_id.clone(),
                tier,
            },
        ];
        Self {
            user_id,
            status,
            steps,
        }
    }

    /// Status change on an existing record, with the tier derived from it.
    pub fn status_change(
        user_id: UserId,
        status: SubscriptionStatus,
        period_end: Option<Timestamp>,
    ) -> Self {
        let tier = EntitlementTier::for_status(status);
        let update = WriteStep::UpdateSubscription {
            user_id: user_id.clone(),
            status,
            period_end,
        };
        let set_tier = WriteStep::SetTier {
            user_id: user_id.clone(),
            tier,
        };
        let steps = if tier.is_premium() {
            vec![update, set_tier]
        } else {
            vec![set_tier, update]
        };
        Self {
            user_id,
            status,
            steps,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Status the record holds once every step is applied.
    pub fn final_status(&self) -> SubscriptionStatus {
        self.status
    }

    /// Tier the profile holds once every step is applied.
    pub fn final_tier(&self) -> EntitlementTier {
        EntitlementTier::for_status(self.status)
    }

    pub fn steps(&self) -> &[WriteStep] {
        &self.steps
    }
}
