//! ListMeditationsHandler - a user's recent meditation history.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::meditation::Meditation;
use crate::ports::MeditationRepository;

/// Number of meditations returned by the history query.
pub const HISTORY_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct ListMeditationsQuery {
    pub user_id: UserId,
}

pub struct ListMeditationsHandler {
    repository: Arc<dyn MeditationRepository>,
}

impl ListMeditationsHandler {
    pub fn new(repository: Arc<dyn MeditationRepository>) -> Self {
        Self { repository }
    }

    /// Newest first, at most [`HISTORY_LIMIT`] entries.
    pub async fn handle(&self, query: ListMeditationsQuery) -> Result<Vec<Meditation>, DomainError> {
        self.repository
            .list_recent(&query.user_id, HISTORY_LIMIT)
            .await
    }
}
