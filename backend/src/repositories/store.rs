use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{store::Store, user::User};
use crate::repositories::{
    transaction::{begin_transaction, commit_transaction},
    user::insert_user,
};
use crate::types::StoreId;

const STORE_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Inserts the store and its manager atomically.
    async fn create_with_manager(&self, store: &Store, manager: &User) -> Result<(), AppError>;

    async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, AppError>;

    async fn list(&self) -> Result<Vec<Store>, AppError>;

    async fn update(&self, store: &Store) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn create_with_manager(&self, store: &Store, manager: &User) -> Result<(), AppError> {
        let mut tx = begin_transaction(&self.pool).await?;
        sqlx::query(
            "INSERT INTO stores (id, name, description, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.description)
        .bind(store.is_active)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&mut *tx)
        .await?;
        insert_user(&mut *tx, manager).await?;
        commit_transaction(tx).await
    }

    async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {} FROM stores WHERE id = $1",
            STORE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }

    async fn list(&self) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {} FROM stores ORDER BY created_at ASC, id ASC",
            STORE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(stores)
    }

    async fn update(&self, store: &Store) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE stores SET name = $1, description = $2, is_active = $3, updated_at = $4 \
             WHERE id = $5",
        )
        .bind(&store.name)
        .bind(&store.description)
        .bind(store.is_active)
        .bind(store.updated_at)
        .bind(store.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Store not found".into()));
        }
        Ok(())
    }
}
