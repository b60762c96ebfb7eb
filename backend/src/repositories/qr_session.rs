use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::qr_session::QrSession;
use crate::types::StoreId;

const QR_SESSION_COLUMNS: &str = "id, store_id, token, created_at, expires_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrSessionRepository: Send + Sync {
    async fn create(&self, session: &QrSession) -> Result<(), AppError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<QrSession>, AppError>;

    /// Newest first.
    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<QrSession>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgQrSessionRepository {
    pool: PgPool,
}

impl PgQrSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QrSessionRepository for PgQrSessionRepository {
    async fn create(&self, session: &QrSession) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO qr_sessions (id, store_id, token, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id)
        .bind(session.store_id)
        .bind(&session.token)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<QrSession>, AppError> {
        let session = sqlx::query_as::<_, QrSession>(&format!(
            "SELECT {} FROM qr_sessions WHERE token = $1",
            QR_SESSION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<QrSession>, AppError> {
        let sessions = sqlx::query_as::<_, QrSession>(&format!(
            "SELECT {} FROM qr_sessions WHERE store_id = $1 ORDER BY created_at DESC, id DESC",
            QR_SESSION_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }
}
