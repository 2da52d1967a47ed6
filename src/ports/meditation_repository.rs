//! Meditation repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::meditation::Meditation;

#[async_trait]
pub trait MeditationRepository: Send + Sync {
    /// Persists a meditation owned by a user.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for a meditation without an owner
    /// - `DatabaseError` on persistence failure
    async fn save(&self, meditation: &Meditation) -> Result<(), DomainError>;

    /// Most recent meditations of a user, newest first.
    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Meditation>, DomainError>;
}
