//! In-memory meditation repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::meditation::Meditation;
use crate::ports::MeditationRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMeditationRepository {
    meditations: Arc<RwLock<Vec<Meditation>>>,
}

impl InMemoryMeditationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.meditations.read().await.len()
    }
}

#[async_trait]
impl MeditationRepository for InMemoryMeditationRepository {
    async fn save(&self, meditation: &Meditation) -> Result<(), DomainError> {
        if !meditation.is_persistable() {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Meditation has no owner",
            ));
        }
        self.meditations.write().await.push(meditation.clone());
        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Meditation>, DomainError> {
        let meditations = self.meditations.read().await;
        let mut owned: Vec<Meditation> = meditations
            .iter()
            .filter(|m| m.user_id.as_ref() == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit as usize);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MeditationId, Timestamp};

    fn meditation(user: Option<&str>, created_secs: i64) -> Meditation {
        Meditation {
            id: MeditationId::new(),
            user_id: user.map(|u| UserId::new(u).unwrap()),
            title: "Spokojna Noc".to_string(),
            script: "script".to_string(),
            audio_url: None,
            duration_seconds: 600,
            theme: "sleep".to_string(),
            language: "pl".to_string(),
            created_at: Timestamp::from_unix_secs(created_secs).unwrap(),
        }
    }

    #[tokio::test]
    async fn lists_newest_first_and_respects_limit() {
        let repo = InMemoryMeditationRepository::new();
        for secs in [100, 300, 200] {
            repo.save(&meditation(Some("u1"), secs)).await.unwrap();
        }
        repo.save(&meditation(Some("u2"), 400)).await.unwrap();

        let listed = repo.list_recent(&UserId::new("u1").unwrap(), 2).await.unwrap();

        let times: Vec<i64> = listed.iter().map(|m| m.created_at.as_unix_secs()).collect();
        assert_eq!(times, vec![300, 200]);
    }

    #[tokio::test]
    async fn anonymous_meditations_are_rejected() {
        let repo = InMemoryMeditationRepository::new();

        let err = repo.save(&meditation(None, 100)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(repo.count().await, 0);
    }
}
