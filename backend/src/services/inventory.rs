use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        clothing_item::{ClothingItem, ClothingItemResponse, NewClothingItem, UpdateClothingItem},
        usage_log::UsageAction,
    },
    repositories::ClothingItemRepository,
    services::usage_log::UsageLogService,
    types::{ClothingItemId, StoreId},
    utils::storage::{ext_from_mime, new_key, FileStorage},
};

/// Manager inventory for a single store.
#[derive(Clone)]
pub struct InventoryService {
    items: Arc<dyn ClothingItemRepository>,
    storage: FileStorage,
    usage_log: UsageLogService,
}

fn normalize_barcode(barcode: Option<String>) -> Option<String> {
    barcode
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
}

impl InventoryService {
    pub fn new(
        items: Arc<dyn ClothingItemRepository>,
        storage: FileStorage,
        usage_log: UsageLogService,
    ) -> Self {
        Self {
            items,
            storage,
            usage_log,
        }
    }

    pub fn to_response(&self, item: ClothingItem) -> ClothingItemResponse {
        let image_url = self.storage.public_url(&item.image_ref);
        ClothingItemResponse::from_item(item, image_url)
    }

    pub async fn create(
        &self,
        store_id: StoreId,
        new_item: NewClothingItem,
    ) -> Result<ClothingItemResponse, AppError> {
        new_item.validate()?;
        let ext = ext_from_mime(&new_item.content_type).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported image type: {}", new_item.content_type))
        })?;
        if new_item.image.is_empty() {
            return Err(AppError::BadRequest("Image file is empty".into()));
        }

        let key = new_key("items", store_id, ext);
        self.storage.put(&key, &new_item.image).await?;

        let item = ClothingItem::new(
            store_id,
            new_item.name.trim().to_string(),
            new_item.category,
            normalize_barcode(new_item.barcode),
            key.clone(),
        );
        if let Err(err) = self.items.create(&item).await {
            // Do not leave an orphaned image behind a rejected insert.
            if let Err(cleanup) = self.storage.delete(&key).await {
                tracing::warn!(error = ?cleanup, key = %key, "Failed to remove orphaned item image");
            }
            return Err(err);
        }

        self.usage_log
            .record(
                store_id,
                UsageAction::ItemCreated,
                Some(json!({ "item_id": item.id, "category": item.category.as_str() })),
            )
            .await?;
        tracing::info!(store_id = %store_id, item_id = %item.id, "Clothing item created");
        Ok(self.to_response(item))
    }

    pub async fn list(&self, store_id: StoreId) -> Result<Vec<ClothingItemResponse>, AppError> {
        let items = self.items.list_by_store(store_id).await?;
        Ok(items.into_iter().map(|item| self.to_response(item)).collect())
    }

    pub async fn update(
        &self,
        store_id: StoreId,
        item_id: ClothingItemId,
        payload: UpdateClothingItem,
    ) -> Result<ClothingItemResponse, AppError> {
        payload.validate()?;
        let mut item = self
            .items
            .find_in_store(store_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Clothing item not found".into()))?;

        if let Some(name) = payload.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = payload.category {
            item.category = category;
        }
        if payload.barcode.is_some() {
            item.barcode = normalize_barcode(payload.barcode);
        }
        if let Some(is_available) = payload.is_available {
            item.is_available = is_available;
        }
        item.updated_at = Utc::now();

        self.items.update(&item).await?;
        self.usage_log
            .record(
                store_id,
                UsageAction::ItemUpdated,
                Some(json!({ "item_id": item.id, "is_available": item.is_available })),
            )
            .await?;
        Ok(self.to_response(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clothing_item::ClothingCategory;
    use crate::repositories::MemoryStore;
    use crate::utils::ManualClock;

    fn service(dir: &std::path::Path) -> InventoryService {
        let memory = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        InventoryService::new(
            memory.clone(),
            FileStorage::new(dir),
            UsageLogService::new(memory, clock),
        )
    }

    fn shirt(barcode: Option<&str>) -> NewClothingItem {
        NewClothingItem {
            name: "Oxford shirt".into(),
            category: ClothingCategory::Tops,
            barcode: barcode.map(str::to_string),
            image: b"png-bytes".to_vec(),
            content_type: "image/png".into(),
        }
    }

    #[tokio::test]
    async fn create_stores_image_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = service(dir.path());
        let store_id = StoreId::new();

        let item = inventory.create(store_id, shirt(Some(" 0042 "))).await.unwrap();
        assert_eq!(item.barcode.as_deref(), Some("0042"));
        assert!(item.image_url.starts_with(&format!("/uploads/items/{}/", store_id)));
        assert!(item.image_url.ends_with(".png"));
        assert_eq!(item.try_on_count, 0);
    }

    #[tokio::test]
    async fn duplicate_barcode_conflicts_and_cleans_up_image() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = service(dir.path());
        let store_id = StoreId::new();

        inventory.create(store_id, shirt(Some("0042"))).await.unwrap();
        let err = inventory
            .create(store_id, shirt(Some("0042")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut entries = tokio::fs::read_dir(dir.path().join("items").join(store_id.to_string()))
            .await
            .unwrap();
        let mut files = 0;
        while entries.next_entry().await.unwrap().is_some() {
            files += 1;
        }
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn rejects_non_image_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = service(dir.path());
        let mut item = shirt(None);
        item.content_type = "text/plain".into();
        let err = inventory.create(StoreId::new(), item).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_is_scoped_to_store_and_clears_barcode() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = service(dir.path());
        let store_id = StoreId::new();
        let item = inventory.create(store_id, shirt(Some("0042"))).await.unwrap();

        let err = inventory
            .update(StoreId::new(), item.id, UpdateClothingItem::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let updated = inventory
            .update(
                store_id,
                item.id,
                UpdateClothingItem {
                    barcode: Some(String::new()),
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.barcode.is_none());
        assert!(!updated.is_available);
    }
}
