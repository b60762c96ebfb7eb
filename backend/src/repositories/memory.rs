//! In-process storage backend implementing every repository trait.
//!
//! Selected with `STORAGE_BACKEND=memory` and used by the test suites. Enforces
//! the same uniqueness rules as the Postgres schema; the whole store sits behind
//! one mutex, so every method is atomic.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{
    clothing_item::{ClothingCategory, ClothingItem},
    customer_session::CustomerSession,
    qr_session::QrSession,
    store::Store,
    try_on::TryOnHistory,
    usage_log::UsageLog,
    user::{User, UserRole},
};
use crate::repositories::{
    ClothingItemRepository, CustomerSessionRepository, QrSessionRepository, StoreRepository,
    TryOnRepository, UsageLogRepository, UserRepository,
};
use crate::types::{ClothingItemId, CustomerSessionId, StoreId, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    stores: Vec<Store>,
    items: Vec<ClothingItem>,
    qr_sessions: Vec<QrSession>,
    customer_sessions: Vec<CustomerSession>,
    history: Vec<TryOnHistory>,
    usage_logs: Vec<UsageLog>,
}

impl Tables {
    fn barcode_taken(&self, item: &ClothingItem) -> bool {
        let Some(barcode) = item.barcode.as_deref() else {
            return false;
        };
        self.items.iter().any(|other| {
            other.id != item.id
                && other.store_id == item.store_id
                && other.barcode.as_deref() == Some(barcode)
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("memory store poisoned")))
    }
}

fn barcode_conflict() -> AppError {
    AppError::Conflict("Barcode is already used by another item in this store".into())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_manager_by_store(&self, store_id: StoreId) -> Result<Option<User>, AppError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.role == UserRole::Manager && u.store_id == Some(store_id))
            .cloned())
    }

    async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
        password_reset_required: bool,
    ) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.password_hash = password_hash.to_string();
        user.password_reset_required = password_reset_required;
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl StoreRepository for MemoryStore {
    async fn create_with_manager(&self, store: &Store, manager: &User) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.email == manager.email) {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
        tables.stores.push(store.clone());
        tables.users.push(manager.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: StoreId) -> Result<Option<Store>, AppError> {
        Ok(self.tables()?.stores.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Store>, AppError> {
        Ok(self.tables()?.stores.clone())
    }

    async fn update(&self, store: &Store) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        let existing = tables
            .stores
            .iter_mut()
            .find(|s| s.id == store.id)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;
        *existing = store.clone();
        Ok(())
    }
}

#[async_trait]
impl ClothingItemRepository for MemoryStore {
    async fn create(&self, item: &ClothingItem) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.barcode_taken(item) {
            return Err(barcode_conflict());
        }
        tables.items.push(item.clone());
        Ok(())
    }

    async fn find_in_store(
        &self,
        store_id: StoreId,
        id: ClothingItemId,
    ) -> Result<Option<ClothingItem>, AppError> {
        Ok(self
            .tables()?
            .items
            .iter()
            .find(|i| i.id == id && i.store_id == store_id)
            .cloned())
    }

    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<ClothingItem>, AppError> {
        Ok(self
            .tables()?
            .items
            .iter()
            .filter(|i| i.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn list_available(
        &self,
        store_id: StoreId,
        category: Option<ClothingCategory>,
    ) -> Result<Vec<ClothingItem>, AppError> {
        Ok(self
            .tables()?
            .items
            .iter()
            .filter(|i| i.store_id == store_id && i.is_available)
            .filter(|i| category.map_or(true, |c| i.category == c))
            .cloned()
            .collect())
    }

    async fn update(&self, item: &ClothingItem) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.barcode_taken(item) {
            return Err(barcode_conflict());
        }
        let existing = tables
            .items
            .iter_mut()
            .find(|i| i.id == item.id && i.store_id == item.store_id)
            .ok_or_else(|| AppError::NotFound("Clothing item not found".into()))?;
        existing.name = item.name.clone();
        existing.category = item.category;
        existing.barcode = item.barcode.clone();
        existing.is_available = item.is_available;
        existing.updated_at = item.updated_at;
        Ok(())
    }
}

#[async_trait]
impl QrSessionRepository for MemoryStore {
    async fn create(&self, session: &QrSession) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        if tables.qr_sessions.iter().any(|q| q.token == session.token) {
            return Err(AppError::Conflict("Token already exists".into()));
        }
        tables.qr_sessions.push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<QrSession>, AppError> {
        Ok(self
            .tables()?
            .qr_sessions
            .iter()
            .find(|q| q.token == token)
            .cloned())
    }

    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<QrSession>, AppError> {
        Ok(self
            .tables()?
            .qr_sessions
            .iter()
            .rev()
            .filter(|q| q.store_id == store_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CustomerSessionRepository for MemoryStore {
    async fn create(&self, session: &CustomerSession) -> Result<(), AppError> {
        self.tables()?.customer_sessions.push(session.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CustomerSessionId,
    ) -> Result<Option<CustomerSession>, AppError> {
        Ok(self
            .tables()?
            .customer_sessions
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn replace_photo(
        &self,
        id: CustomerSessionId,
        photo_ref: Option<String>,
    ) -> Result<Option<String>, AppError> {
        let mut tables = self.tables()?;
        let session = tables
            .customer_sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound("Session not found".into()))?;
        Ok(std::mem::replace(&mut session.photo_ref, photo_ref))
    }

    async fn list_expired_with_photo(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CustomerSession>, AppError> {
        Ok(self
            .tables()?
            .customer_sessions
            .iter()
            .filter(|s| s.expires_at <= now && s.photo_ref.is_some())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TryOnRepository for MemoryStore {
    async fn record_try_on(
        &self,
        history: &TryOnHistory,
        log: &UsageLog,
    ) -> Result<i64, AppError> {
        let mut tables = self.tables()?;
        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == history.clothing_item_id && i.store_id == history.store_id)
            .ok_or_else(|| AppError::NotFound("Clothing item not found".into()))?;
        item.try_on_count += 1;
        let count = item.try_on_count;
        tables.history.push(history.clone());
        tables.usage_logs.push(log.clone());
        Ok(count)
    }

    async fn list_by_session(
        &self,
        session_id: CustomerSessionId,
    ) -> Result<Vec<TryOnHistory>, AppError> {
        Ok(self
            .tables()?
            .history
            .iter()
            .filter(|h| h.customer_session_id == session_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UsageLogRepository for MemoryStore {
    async fn insert(&self, log: &UsageLog) -> Result<(), AppError> {
        self.tables()?.usage_logs.push(log.clone());
        Ok(())
    }

    async fn list(&self, store_id: Option<StoreId>, limit: i64) -> Result<Vec<UsageLog>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .tables()?
            .usage_logs
            .iter()
            .rev()
            .filter(|l| store_id.map_or(true, |id| l.store_id == id))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(store_id: StoreId, barcode: Option<&str>) -> ClothingItem {
        ClothingItem::new(
            store_id,
            "Denim jacket".into(),
            ClothingCategory::Outerwear,
            barcode.map(str::to_string),
            "items/jacket.png".into(),
        )
    }

    #[tokio::test]
    async fn barcode_is_unique_per_store_only() {
        let store = MemoryStore::new();
        let a = StoreId::new();
        let b = StoreId::new();

        ClothingItemRepository::create(&store, &item(a, Some("123")))
            .await
            .unwrap();
        ClothingItemRepository::create(&store, &item(b, Some("123")))
            .await
            .unwrap();
        let err = ClothingItemRepository::create(&store, &item(a, Some("123")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        ClothingItemRepository::create(&store, &item(a, None))
            .await
            .unwrap();
        ClothingItemRepository::create(&store, &item(a, None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn items_are_not_visible_across_stores() {
        let store = MemoryStore::new();
        let a = StoreId::new();
        let jacket = item(a, None);
        ClothingItemRepository::create(&store, &jacket).await.unwrap();

        assert!(store
            .find_in_store(StoreId::new(), jacket.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_in_store(a, jacket.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn record_try_on_for_foreign_item_writes_nothing() {
        let store = MemoryStore::new();
        let jacket = item(StoreId::new(), None);
        ClothingItemRepository::create(&store, &jacket).await.unwrap();

        let foreign_store = StoreId::new();
        let history = TryOnHistory::new(
            CustomerSessionId::new(),
            jacket.id,
            foreign_store,
            "r".into(),
            Utc::now(),
        );
        let log = UsageLog::new(
            foreign_store,
            crate::models::usage_log::UsageAction::TryOnGenerated,
            None,
            Utc::now(),
        );
        let err = store.record_try_on(&history, &log).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store
            .list_by_session(history.customer_session_id)
            .await
            .unwrap()
            .is_empty());
        assert!(UsageLogRepository::list(&store, None, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn usage_logs_list_newest_first_with_limit() {
        let store = MemoryStore::new();
        let store_id = StoreId::new();
        for action in [
            crate::models::usage_log::UsageAction::ItemCreated,
            crate::models::usage_log::UsageAction::QrSessionIssued,
            crate::models::usage_log::UsageAction::PhotoUploaded,
        ] {
            store
                .insert(&UsageLog::new(store_id, action, None, Utc::now()))
                .await
                .unwrap();
        }
        let logs = UsageLogRepository::list(&store, Some(store_id), 2)
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, "photo_uploaded");
        assert_eq!(logs[1].action, "qr_session_issued");
    }
}
