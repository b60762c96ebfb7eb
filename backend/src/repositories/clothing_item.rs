//! Clothing inventory. Every lookup is scoped by store id.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::clothing_item::{ClothingCategory, ClothingItem};
use crate::types::{ClothingItemId, StoreId};

const ITEM_COLUMNS: &str = "id, store_id, name, category, barcode, image_ref, is_available, \
                            try_on_count, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClothingItemRepository: Send + Sync {
    /// Fails with `Conflict` when the barcode is already used in the same store.
    async fn create(&self, item: &ClothingItem) -> Result<(), AppError>;

    /// Returns `None` for items of other stores, exactly as for missing ones.
    async fn find_in_store(
        &self,
        store_id: StoreId,
        id: ClothingItemId,
    ) -> Result<Option<ClothingItem>, AppError>;

    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<ClothingItem>, AppError>;

    async fn list_available(
        &self,
        store_id: StoreId,
        category: Option<ClothingCategory>,
    ) -> Result<Vec<ClothingItem>, AppError>;

    /// Writes the mutable fields; never touches `try_on_count`.
    async fn update(&self, item: &ClothingItem) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PgClothingItemRepository {
    pool: PgPool,
}

impl PgClothingItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClothingItemRepository for PgClothingItemRepository {
    async fn create(&self, item: &ClothingItem) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO clothing_items (id, store_id, name, category, barcode, image_ref, \
             is_available, try_on_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(item.id)
        .bind(item.store_id)
        .bind(&item.name)
        .bind(item.category)
        .bind(&item.barcode)
        .bind(&item.image_ref)
        .bind(item.is_available)
        .bind(item.try_on_count)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(barcode_conflict)?;
        Ok(())
    }

    async fn find_in_store(
        &self,
        store_id: StoreId,
        id: ClothingItemId,
    ) -> Result<Option<ClothingItem>, AppError> {
        let item = sqlx::query_as::<_, ClothingItem>(&format!(
            "SELECT {} FROM clothing_items WHERE id = $1 AND store_id = $2",
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<ClothingItem>, AppError> {
        let items = sqlx::query_as::<_, ClothingItem>(&format!(
            "SELECT {} FROM clothing_items WHERE store_id = $1 ORDER BY created_at ASC, id ASC",
            ITEM_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn list_available(
        &self,
        store_id: StoreId,
        category: Option<ClothingCategory>,
    ) -> Result<Vec<ClothingItem>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM clothing_items WHERE is_available = TRUE AND store_id = ",
            ITEM_COLUMNS
        ));
        builder.push_bind(store_id);
        if let Some(category) = category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        builder.push(" ORDER BY created_at ASC, id ASC");

        let items = builder
            .build_query_as::<ClothingItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn update(&self, item: &ClothingItem) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE clothing_items SET name = $1, category = $2, barcode = $3, is_available = $4, \
             updated_at = $5 WHERE id = $6 AND store_id = $7",
        )
        .bind(&item.name)
        .bind(item.category)
        .bind(&item.barcode)
        .bind(item.is_available)
        .bind(item.updated_at)
        .bind(item.id)
        .bind(item.store_id)
        .execute(&self.pool)
        .await
        .map_err(barcode_conflict)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Clothing item not found".into()));
        }
        Ok(())
    }
}

fn barcode_conflict(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => {
            AppError::Conflict("Barcode is already used by another item in this store".into())
        }
        other => other,
    }
}
