//! Owner-side store management. Creating a store provisions its manager.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        store::{
            CreateStoreRequest, ManagerPasswordResetResponse, ProvisionedStoreResponse, Store,
            UpdateStoreRequest,
        },
        usage_log::UsageAction,
        user::{User, UserResponse, UserRole},
    },
    repositories::{StoreRepository, UserRepository},
    services::usage_log::UsageLogService,
    types::StoreId,
    utils::{generate_temporary_password, hash_password},
};

#[derive(Clone)]
pub struct StoreService {
    stores: Arc<dyn StoreRepository>,
    users: Arc<dyn UserRepository>,
    usage_log: UsageLogService,
}

impl StoreService {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        users: Arc<dyn UserRepository>,
        usage_log: UsageLogService,
    ) -> Self {
        Self {
            stores,
            users,
            usage_log,
        }
    }

    pub async fn provision(
        &self,
        payload: CreateStoreRequest,
    ) -> Result<ProvisionedStoreResponse, AppError> {
        let manager_email = payload.manager_email.trim().to_lowercase();
        if self.users.find_by_email(&manager_email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".into()));
        }

        let store = Store::new(payload.name.trim().to_string(), payload.description);
        let temporary_password = generate_temporary_password();
        let manager = User::new(
            manager_email,
            hash_password(&temporary_password)?,
            UserRole::Manager,
            Some(store.id),
            true,
        );
        self.stores.create_with_manager(&store, &manager).await?;
        self.usage_log
            .record(
                store.id,
                UsageAction::StoreCreated,
                Some(json!({ "manager_id": manager.id })),
            )
            .await?;
        tracing::info!(store_id = %store.id, manager_id = %manager.id, "Store provisioned");

        Ok(ProvisionedStoreResponse {
            store,
            manager: UserResponse::from(manager),
            temporary_password,
        })
    }

    pub async fn list(&self) -> Result<Vec<Store>, AppError> {
        self.stores.list().await
    }

    pub async fn get(&self, id: StoreId) -> Result<Store, AppError> {
        self.stores
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".into()))
    }

    pub async fn update(&self, id: StoreId, payload: UpdateStoreRequest) -> Result<Store, AppError> {
        let mut store = self.get(id).await?;
        if let Some(name) = payload.name {
            store.name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            store.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(is_active) = payload.is_active {
            store.is_active = is_active;
        }
        store.updated_at = Utc::now();

        self.stores.update(&store).await?;
        self.usage_log
            .record(
                store.id,
                UsageAction::StoreUpdated,
                Some(json!({ "is_active": store.is_active })),
            )
            .await?;
        tracing::info!(store_id = %store.id, is_active = store.is_active, "Store updated");
        Ok(store)
    }

    /// Issues a fresh temporary password for the store's manager.
    pub async fn reset_manager_password(
        &self,
        id: StoreId,
    ) -> Result<ManagerPasswordResetResponse, AppError> {
        let store = self.get(id).await?;
        let mut manager = self
            .users
            .find_manager_by_store(store.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store manager not found".into()))?;

        let temporary_password = generate_temporary_password();
        let password_hash = hash_password(&temporary_password)?;
        self.users
            .update_password(manager.id, &password_hash, true)
            .await?;
        manager.password_hash = password_hash;
        manager.password_reset_required = true;

        self.usage_log
            .record(
                store.id,
                UsageAction::ManagerPasswordReset,
                Some(json!({ "manager_id": manager.id })),
            )
            .await?;
        tracing::info!(store_id = %store.id, manager_id = %manager.id, "Manager password reset");

        Ok(ManagerPasswordResetResponse {
            manager: UserResponse::from(manager),
            temporary_password,
        })
    }
}
