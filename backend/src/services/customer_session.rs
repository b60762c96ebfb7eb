//! Customer-facing session operations. Every call re-checks liveness against the clock.

use std::sync::Arc;

use serde_json::json;

use crate::{
    error::AppError,
    models::{
        clothing_item::{ClothingCategory, ClothingItemResponse},
        customer_session::{CustomerSession, CustomerSessionStatus},
        try_on::{TryOnHistoryResponse, TryOnResponse},
        usage_log::UsageAction,
    },
    repositories::{ClothingItemRepository, CustomerSessionRepository, TryOnRepository},
    services::{
        session_validator::SESSION_EXPIRED_MESSAGE, try_on::TryOnOrchestrator,
        usage_log::UsageLogService,
    },
    types::{ClothingItemId, CustomerSessionId, StoreId},
    utils::{
        storage::{ext_from_mime, new_key, FileStorage},
        Clock,
    },
};

#[derive(Clone)]
pub struct CustomerSessionManager {
    sessions: Arc<dyn CustomerSessionRepository>,
    items: Arc<dyn ClothingItemRepository>,
    try_ons: Arc<dyn TryOnRepository>,
    orchestrator: TryOnOrchestrator,
    storage: FileStorage,
    usage_log: UsageLogService,
    clock: Arc<dyn Clock>,
}

impl CustomerSessionManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<dyn CustomerSessionRepository>,
        items: Arc<dyn ClothingItemRepository>,
        try_ons: Arc<dyn TryOnRepository>,
        orchestrator: TryOnOrchestrator,
        storage: FileStorage,
        usage_log: UsageLogService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            items,
            try_ons,
            orchestrator,
            storage,
            usage_log,
            clock,
        }
    }

    /// Loads a session that exists and has not yet expired.
    pub async fn live_session(&self, id: CustomerSessionId) -> Result<CustomerSession, AppError> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".into()))?;
        if !session.is_live_at(self.clock.now()) {
            tracing::warn!(session_id = %id, "Rejected action on expired session");
            return Err(AppError::Expired(SESSION_EXPIRED_MESSAGE.into()));
        }
        Ok(session)
    }

    pub async fn status(&self, id: CustomerSessionId) -> Result<CustomerSessionStatus, AppError> {
        let session = self.live_session(id).await?;
        Ok(self.status_of(&session))
    }

    fn status_of(&self, session: &CustomerSession) -> CustomerSessionStatus {
        CustomerSessionStatus {
            session_id: session.id,
            store_id: session.store_id,
            expires_at: session.expires_at,
            has_photo: session.photo_ref.is_some(),
            photo_url: session
                .photo_ref
                .as_deref()
                .map(|key| self.storage.public_url(key)),
        }
    }

    /// Points the session at a stored photo, replacing any earlier one.
    pub async fn attach_photo(
        &self,
        id: CustomerSessionId,
        photo_ref: String,
    ) -> Result<CustomerSessionStatus, AppError> {
        let mut session = self.live_session(id).await?;
        let previous = self
            .sessions
            .replace_photo(id, Some(photo_ref.clone()))
            .await?;
        session.photo_ref = Some(photo_ref);

        if let Some(previous) = previous {
            if let Err(err) = self.storage.delete(&previous).await {
                tracing::warn!(error = ?err, session_id = %id, "Failed to remove replaced photo");
            }
        }
        self.usage_log
            .record(
                session.store_id,
                UsageAction::PhotoUploaded,
                Some(json!({ "session_id": id })),
            )
            .await?;
        tracing::info!(store_id = %session.store_id, session_id = %id, "Photo attached");
        Ok(self.status_of(&session))
    }

    /// Stores uploaded bytes and attaches them. Nothing is written for a dead session.
    pub async fn upload_photo(
        &self,
        id: CustomerSessionId,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<CustomerSessionStatus, AppError> {
        self.live_session(id).await?;
        let ext = ext_from_mime(content_type).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported image type: {}", content_type))
        })?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Photo file is empty".into()));
        }

        let key = new_key("photos", id, ext);
        self.storage.put(&key, bytes).await?;
        match self.attach_photo(id, key.clone()).await {
            Ok(status) => Ok(status),
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!(error = ?cleanup, key = %key, "Failed to remove unattached photo");
                }
                Err(err)
            }
        }
    }

    /// Public catalogue of a store; no session required.
    pub async fn list_available_items(
        &self,
        store_id: StoreId,
        category: Option<ClothingCategory>,
    ) -> Result<Vec<ClothingItemResponse>, AppError> {
        let items = self.items.list_available(store_id, category).await?;
        Ok(items
            .into_iter()
            .map(|item| {
                let image_url = self.storage.public_url(&item.image_ref);
                ClothingItemResponse::from_item(item, image_url)
            })
            .collect())
    }

    pub async fn request_try_on(
        &self,
        session_id: CustomerSessionId,
        item_id: ClothingItemId,
    ) -> Result<TryOnResponse, AppError> {
        let session = self.live_session(session_id).await?;
        // Scoped by the session's store: a foreign item is indistinguishable from a missing one.
        let item = self
            .items
            .find_in_store(session.store_id, item_id)
            .await?
            .filter(|item| item.is_available)
            .ok_or_else(|| AppError::NotFound("Clothing item not found".into()))?;

        self.orchestrator.run(&session, &item).await
    }

    pub async fn history(
        &self,
        session_id: CustomerSessionId,
    ) -> Result<Vec<TryOnHistoryResponse>, AppError> {
        let session = self.live_session(session_id).await?;
        let history = self.try_ons.list_by_session(session.id).await?;
        Ok(history
            .into_iter()
            .map(|entry| TryOnHistoryResponse {
                id: entry.id,
                item_id: entry.clothing_item_id,
                result_url: self.storage.public_url(&entry.result_ref),
                created_at: entry.created_at,
            })
            .collect())
    }
}
