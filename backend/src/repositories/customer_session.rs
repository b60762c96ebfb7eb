use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::customer_session::CustomerSession;
use crate::types::CustomerSessionId;

const CUSTOMER_SESSION_COLUMNS: &str =
    "id, qr_session_id, store_id, photo_ref, created_at, expires_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerSessionRepository: Send + Sync {
    async fn create(&self, session: &CustomerSession) -> Result<(), AppError>;

    async fn find_by_id(&self, id: CustomerSessionId)
        -> Result<Option<CustomerSession>, AppError>;

    /// Atomically overwrites (or clears) the photo reference and returns the one it replaced.
    /// `NotFound` if the session is unknown.
    async fn replace_photo(
        &self,
        id: CustomerSessionId,
        photo_ref: Option<String>,
    ) -> Result<Option<String>, AppError>;

    /// Sessions with `expires_at <= now` that still reference a photo.
    async fn list_expired_with_photo(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CustomerSession>, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgCustomerSessionRepository {
    pool: PgPool,
}

impl PgCustomerSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerSessionRepository for PgCustomerSessionRepository {
    async fn create(&self, session: &CustomerSession) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO customer_sessions (id, qr_session_id, store_id, photo_ref, created_at, \
             expires_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.id)
        .bind(session.qr_session_id)
        .bind(session.store_id)
        .bind(&session.photo_ref)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CustomerSessionId,
    ) -> Result<Option<CustomerSession>, AppError> {
        let session = sqlx::query_as::<_, CustomerSession>(&format!(
            "SELECT {} FROM customer_sessions WHERE id = $1",
            CUSTOMER_SESSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn replace_photo(
        &self,
        id: CustomerSessionId,
        photo_ref: Option<String>,
    ) -> Result<Option<String>, AppError> {
        let previous = sqlx::query_scalar::<_, Option<String>>(
            "UPDATE customer_sessions c SET photo_ref = $1 \
             FROM (SELECT id, photo_ref FROM customer_sessions WHERE id = $2 FOR UPDATE) old \
             WHERE c.id = old.id RETURNING old.photo_ref",
        )
        .bind(photo_ref)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        previous.ok_or_else(|| AppError::NotFound("Session not found".into()))
    }

    async fn list_expired_with_photo(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CustomerSession>, AppError> {
        let sessions = sqlx::query_as::<_, CustomerSession>(&format!(
            "SELECT {} FROM customer_sessions WHERE expires_at <= $1 AND photo_ref IS NOT NULL \
             ORDER BY expires_at ASC",
            CUSTOMER_SESSION_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }
}
