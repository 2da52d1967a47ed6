//! GetSubscriptionHandler - read side of the sync engine.

use std::sync::Arc;

use crate::domain::billing::{EntitlementTier, SubscriptionRecord};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionStore;

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

/// Stored record plus the tier currently on the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionView {
    pub record: SubscriptionRecord,
    /// Profile tier; falls back to the tier derived from the record when the
    /// profile is unknown.
    pub tier: EntitlementTier,
}

pub struct GetSubscriptionHandler {
    store: Arc<dyn SubscriptionStore>,
}

impl GetSubscriptionHandler {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Returns `None` if the user never completed a checkout.
    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<Option<SubscriptionView>, DomainError> {
        let Some(record) = self.store.find_by_user_id(&query.user_id).await? else {
            return Ok(None);
        };
        let tier = self
            .store
            .tier_for(&query.user_id)
            .await?
            .unwrap_or_else(|| record.tier());

        Ok(Some(SubscriptionView { record, tier }))
    }
}
