//! PostgreSQL implementation of MeditationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, MeditationId, Timestamp, UserId};
use crate::domain::meditation::Meditation;
use crate::ports::MeditationRepository;

pub struct PostgresMeditationRepository {
    pool: PgPool,
}

impl PostgresMeditationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MeditationRow {
    id: Uuid,
    user_id: String,
    title: String,
    script: String,
    audio_url: Option<String>,
    duration_seconds: i32,
    theme: String,
    language: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MeditationRow> for Meditation {
    type Error = DomainError;

    fn try_from(row: MeditationRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?;

        Ok(Meditation {
            id: MeditationId::from_uuid(row.id),
            user_id: Some(user_id),
            title: row.title,
            script: row.script,
            audio_url: row.audio_url,
            duration_seconds: row.duration_seconds,
            theme: row.theme,
            language: row.language,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl MeditationRepository for PostgresMeditationRepository {
    async fn save(&self, meditation: &Meditation) -> Result<(), DomainError> {
        let user_id = meditation.user_id.as_ref().ok_or_else(|| {
            DomainError::new(ErrorCode::ValidationFailed, "Meditation has no owner")
        })?;

        sqlx::query(
            r#"
            INSERT INTO meditations (
                id, user_id, title, script, audio_url, duration_seconds, theme, language, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(meditation.id.as_uuid())
        .bind(user_id.as_str())
        .bind(&meditation.title)
        .bind(&meditation.script)
        .bind(&meditation.audio_url)
        .bind(meditation.duration_seconds)
        .bind(&meditation.theme)
        .bind(&meditation.language)
        .bind(meditation.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save meditation: {}", e)))?;

        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Meditation>, DomainError> {
        let rows: Vec<MeditationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, script, audio_url, duration_seconds, theme, language, created_at
            FROM meditations
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list meditations: {}", e)))?;

        rows.into_iter().map(Meditation::try_from).collect()
    }
}
