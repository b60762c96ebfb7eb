//! Credential store: staff users (owners and managers).

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::user::User;
use crate::types::{StoreId, UserId};

const USER_COLUMNS: &str = "id, email, password_hash, role, store_id, password_reset_required, \
                            is_active, created_at, updated_at";

/// Repository trait for User operations.
///
/// Use `MockUserRepository` in tests to mock the behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), AppError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;

    /// `email` must already be lowercased.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_manager_by_store(&self, store_id: StoreId) -> Result<Option<User>, AppError>;

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
        password_reset_required: bool,
    ) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        insert_user(&self.pool, user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_manager_by_store(&self, store_id: StoreId) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE store_id = $1 AND role = 'manager' \
             ORDER BY created_at ASC LIMIT 1",
            USER_COLUMNS
        ))
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
        password_reset_required: bool,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, password_reset_required = $2, updated_at = $3 \
             WHERE id = $4",
        )
        .bind(password_hash)
        .bind(password_reset_required)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }
}

pub(crate) async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO users (id, email, password_hash, role, store_id, password_reset_required, \
         is_active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.store_id)
    .bind(user.password_reset_required)
    .bind(user.is_active)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
