//! Try-on history and the counter increment that accompanies it.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{try_on::TryOnHistory, usage_log::UsageLog};
use crate::repositories::{
    transaction::{begin_transaction, commit_transaction},
    usage_log::insert_usage_log,
};
use crate::types::CustomerSessionId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TryOnRepository: Send + Sync {
    /// Atomically bumps the item's try-on counter, appends the history row and
    /// the usage log entry. Either all three land or none do.
    ///
    /// Returns the counter value after the increment.
    async fn record_try_on(&self, history: &TryOnHistory, log: &UsageLog)
        -> Result<i64, AppError>;

    /// Oldest first.
    async fn list_by_session(
        &self,
        session_id: CustomerSessionId,
    ) -> Result<Vec<TryOnHistory>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgTryOnRepository {
    pool: PgPool,
}

impl PgTryOnRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TryOnRepository for PgTryOnRepository {
    async fn record_try_on(
        &self,
        history: &TryOnHistory,
        log: &UsageLog,
    ) -> Result<i64, AppError> {
        let mut tx = begin_transaction(&self.pool).await?;

        // Single-statement increment; concurrent callers serialize on the row lock.
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE clothing_items SET try_on_count = try_on_count + 1 \
             WHERE id = $1 AND store_id = $2 RETURNING try_on_count",
        )
        .bind(history.clothing_item_id)
        .bind(history.store_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(count) = count else {
            return Err(AppError::NotFound("Clothing item not found".into()));
        };

        sqlx::query(
            "INSERT INTO try_on_history (id, customer_session_id, clothing_item_id, store_id, \
             result_ref, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(history.id)
        .bind(history.customer_session_id)
        .bind(history.clothing_item_id)
        .bind(history.store_id)
        .bind(&history.result_ref)
        .bind(history.created_at)
        .execute(&mut *tx)
        .await?;

        insert_usage_log(&mut *tx, log).await?;
        commit_transaction(tx).await?;
        Ok(count)
    }

    async fn list_by_session(
        &self,
        session_id: CustomerSessionId,
    ) -> Result<Vec<TryOnHistory>, AppError> {
        let history = sqlx::query_as::<_, TryOnHistory>(
            "SELECT id, customer_session_id, clothing_item_id, store_id, result_ref, created_at \
             FROM try_on_history WHERE customer_session_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }
}
