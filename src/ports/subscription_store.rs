//! Subscription store port.
//!
//! Backs two tables: subscriptions keyed by user id, and the tier column of
//! user profiles. Profiles are created by the account system; this port only
//! ever updates their tier.
//!
//! # Write plans
//!
//! `apply` receives every write of one transition as an ordered `WritePlan`.
//! Stores with transactions apply it atomically. Stores without them must
//! apply the steps in the given order, which keeps premium-with-inactive-status
//! unobservable between the two writes.

use async_trait::async_trait;

use crate::domain::billing::{EntitlementTier, SubscriptionRecord, WritePlan};
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Resolves a provider customer id to its record.
    ///
    /// Returns `None` if no checkout has been recorded for the customer.
    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<SubscriptionRecord>, DomainError>;

    /// Find the record for a user.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError>;

    /// Current tier on the user's profile, `None` if the profile is unknown.
    async fn tier_for(&self, user_id: &UserId) -> Result<Option<EntitlementTier>, DomainError>;

    /// Applies every step of a transition.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure. Steps already applied by a
    ///   non-transactional store stay applied; replaying the plan converges.
    async fn apply(&self, plan: &WritePlan) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SubscriptionStore) {}
    }
}
