//! In-memory subscription store.
//!
//! Applies write plans one step at a time with a scheduler yield in between,
//! so concurrent readers can land between the two writes of a transition.
//! Every intermediate state is recorded as an observation for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::{
    EntitlementTier, SubscriptionRecord, SubscriptionStatus, WritePlan, WriteStep,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionStore;

/// Status and tier of one user as visible after a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub status: Option<SubscriptionStatus>,
    pub tier: Option<EntitlementTier>,
}

impl Observation {
    /// A premium tier next to a non-active status.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self.tier, Some(EntitlementTier::Premium))
            && self.status != Some(SubscriptionStatus::Active)
    }
}

#[derive(Default)]
struct State {
    subscriptions: HashMap<UserId, SubscriptionRecord>,
    profiles: HashMap<UserId, EntitlementTier>,
    observations: HashMap<UserId, Vec<Observation>>,
}

#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    state: Arc<RwLock<State>>,
    calls: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile on the free tier.
    pub fn with_profile(self, user_id: UserId) -> Self {
        if let Ok(mut state) = self.state.try_write() {
            state.profiles.insert(user_id, EntitlementTier::Free);
        }
        self
    }

    /// Makes every subsequent `apply` fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of port calls of any kind.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of individual write steps applied.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// States of a user seen after each applied step, oldest first.
    pub async fn observations(&self, user_id: &UserId) -> Vec<Observation> {
        self.state
            .read()
            .await
            .observations
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn apply_step(state: &mut State, step: &WriteStep) {
        match step {
            WriteStep::UpsertSubscription(record) => {
                state
                    .subscriptions
                    .insert(record.user_id.clone(), record.clone());
            }
            WriteStep::UpdateSubscription {
                user_id,
                status,
                period_end,
            } => match state.subscriptions.get_mut(user_id) {
                Some(record) => {
                    record.status = *status;
                    if period_end.is_some() {
                        record.period_end = *period_end;
                    }
                }
                None => {
                    tracing::warn!(user_id = %user_id, "Status update for missing subscription ignored");
                }
            },
            WriteStep::SetTier { user_id, tier } => match state.profiles.get_mut(user_id) {
                Some(current) => *current = *tier,
                None => {
                    tracing::warn!(user_id = %user_id, tier = %tier, "Tier update for unknown profile ignored");
                }
            },
        }
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .values()
            .find(|r| r.customer_id == customer_id)
            .cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.read().await.subscriptions.get(user_id).cloned())
    }

    async fn tier_for(&self, user_id: &UserId) -> Result<Option<EntitlementTier>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.read().await.profiles.get(user_id).copied())
    }

    async fn apply(&self, plan: &WritePlan) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("in-memory store is failing writes"));
        }

        for step in plan.steps() {
            {
                let mut state = self.state.write().await;
                Self::apply_step(&mut state, step);
                let observation = Observation {
                    status: state.subscriptions.get(plan.user_id()).map(|r| r.status),
                    tier: state.profiles.get(plan.user_id()).copied(),
                };
                state
                    .observations
                    .entry(plan.user_id().clone())
                    .or_default()
                    .push(observation);
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}
