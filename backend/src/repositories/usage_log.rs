use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::usage_log::UsageLog;
use crate::types::StoreId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageLogRepository: Send + Sync {
    async fn insert(&self, log: &UsageLog) -> Result<(), AppError>;

    /// Newest first, at most `limit` rows.
    async fn list(&self, store_id: Option<StoreId>, limit: i64) -> Result<Vec<UsageLog>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgUsageLogRepository {
    pool: PgPool,
}

impl PgUsageLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageLogRepository for PgUsageLogRepository {
    async fn insert(&self, log: &UsageLog) -> Result<(), AppError> {
        insert_usage_log(&self.pool, log).await
    }

    async fn list(&self, store_id: Option<StoreId>, limit: i64) -> Result<Vec<UsageLog>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, store_id, action, metadata, created_at FROM usage_logs",
        );
        if let Some(store_id) = store_id {
            builder.push(" WHERE store_id = ");
            builder.push_bind(store_id);
        }
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);

        let logs = builder
            .build_query_as::<UsageLog>()
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }
}

pub(crate) async fn insert_usage_log<'e, E>(executor: E, log: &UsageLog) -> Result<(), AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO usage_logs (id, store_id, action, metadata, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(log.id)
    .bind(log.store_id)
    .bind(&log.action)
    .bind(&log.metadata)
    .bind(log.created_at)
    .execute(executor)
    .await?;
    Ok(())
}
