//! PostgreSQL implementation of SubscriptionStore.
//!
//! Every write plan runs inside one transaction, so the subscription row and
//! the profile tier change together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::billing::{
    EntitlementTier, SubscriptionRecord, SubscriptionStatus, WritePlan, WriteStep,
};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::SubscriptionStore;

pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: String,
    stripe_customer_id: String,
    stripe_subscription_id: String,
    status: String,
    plan: String,
    current_period_end: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status: SubscriptionStatus = row.status.parse().map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;
        let user_id = UserId::new(row.user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?;

        Ok(SubscriptionRecord {
            user_id,
            customer_id: row.stripe_customer_id,
            subscription_id: row.stripe_subscription_id,
            status,
            plan: row.plan,
            period_end: row.current_period_end.map(Timestamp::from_datetime),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, stripe_customer_id, stripe_subscription_id, status, plan, current_period_end
    FROM subscriptions
"#;

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

async fn apply_step(
    tx: &mut Transaction<'_, Postgres>,
    step: &WriteStep,
) -> Result<(), DomainError> {
    match step {
        WriteStep::UpsertSubscription(record) => {
            sqlx::query(
                r#"
                INSERT INTO subscriptions (
                    user_id, stripe_customer_id, stripe_subscription_id, status, plan,
                    current_period_end, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
                ON CONFLICT (user_id) DO UPDATE SET
                    stripe_customer_id = EXCLUDED.stripe_customer_id,
                    stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                    status = EXCLUDED.status,
                    plan = EXCLUDED.plan,
                    current_period_end = COALESCE(EXCLUDED.current_period_end, subscriptions.current_period_end),
                    updated_at = NOW()
                "#,
            )
            .bind(record.user_id.as_str())
            .bind(&record.customer_id)
            .bind(&record.subscription_id)
            .bind(record.status.as_str())
            .bind(&record.plan)
            .bind(record.period_end.map(|t| *t.as_datetime()))
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to upsert subscription", e))?;
        }
        WriteStep::UpdateSubscription {
            user_id,
            status,
            period_end,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE subscriptions SET
                    status = $2,
                    current_period_end = COALESCE($3, current_period_end),
                    updated_at = NOW()
                WHERE user_id = $1
                "#,
            )
            .bind(user_id.as_str())
            .bind(status.as_str())
            .bind(period_end.map(|t| *t.as_datetime()))
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to update subscription", e))?;

            if result.rows_affected() == 0 {
                tracing::warn!(user_id = %user_id, "Status update matched no subscription row");
            }
        }
        WriteStep::SetTier { user_id, tier } => {
            let result = sqlx::query("UPDATE profiles SET tier = $2, updated_at = NOW() WHERE id = $1")
                .bind(user_id.as_str())
                .bind(tier.as_str())
                .execute(&mut **tx)
                .await
                .map_err(|e| db_error("Failed to update profile tier", e))?;

            if result.rows_affected() == 0 {
                tracing::warn!(user_id = %user_id, tier = %tier, "Tier update matched no profile");
            }
        }
    }
    Ok(())
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE stripe_customer_id = $1 ORDER BY updated_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find subscription by customer", e))?;

        row.map(SubscriptionRecord::try_from).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SubscriptionRecord>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_COLUMNS))
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find subscription by user", e))?;

        row.map(SubscriptionRecord::try_from).transpose()
    }

    async fn tier_for(&self, user_id: &UserId) -> Result<Option<EntitlementTier>, DomainError> {
        let tier: Option<String> = sqlx::query_scalar("SELECT tier FROM profiles WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to read profile tier", e))?;

        tier.map(|t| {
            t.parse::<EntitlementTier>().map_err(|_| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid tier value: {}", t))
            })
        })
        .transpose()
    }

    async fn apply(&self, plan: &WritePlan) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        for step in plan.steps() {
            apply_step(&mut tx, step).await?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        tracing::debug!(
            user_id = %plan.user_id(),
            status = %plan.final_status(),
            tier = %plan.final_tier(),
            "Subscription transition committed"
        );
        Ok(())
    }
}
