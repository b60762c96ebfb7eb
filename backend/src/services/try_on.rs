//! Try-on orchestration: the only place where generator output reaches persistent records.

use std::sync::Arc;

use serde_json::json;

use crate::{
    error::AppError,
    models::{
        clothing_item::ClothingItem,
        customer_session::CustomerSession,
        try_on::{TryOnHistory, TryOnMode, TryOnResponse},
        usage_log::UsageAction,
    },
    repositories::TryOnRepository,
    services::{
        image_generator::{GenerationError, ImageGenerator},
        usage_log::UsageLogService,
    },
    types::CustomerSessionId,
    utils::{
        storage::{new_key, FileStorage},
        Clock,
    },
};

pub const PHOTO_REQUIRED_MESSAGE: &str = "Upload a photo first";

/// Storage kind for generated composites, scoped by customer session.
pub const RESULTS_KIND: &str = "results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub result_ref: String,
    pub mode: TryOnMode,
}

#[derive(Clone)]
pub struct TryOnOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    storage: FileStorage,
    try_ons: Arc<dyn TryOnRepository>,
    usage_log: UsageLogService,
    clock: Arc<dyn Clock>,
}

impl TryOnOrchestrator {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        storage: FileStorage,
        try_ons: Arc<dyn TryOnRepository>,
        usage_log: UsageLogService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generator,
            storage,
            try_ons,
            usage_log,
            clock,
        }
    }

    /// Produces the result image. Without a configured generator the garment
    /// image itself becomes the result.
    pub async fn generate(
        &self,
        session_id: CustomerSessionId,
        photo_ref: &str,
        garment_ref: &str,
    ) -> Result<GeneratedImage, AppError> {
        let result_ref = new_key(RESULTS_KIND, session_id, "png");
        let outcome = self
            .generator
            .generate(
                &self.storage.path_for(photo_ref),
                &self.storage.path_for(garment_ref),
                &self.storage.path_for(&result_ref),
            )
            .await;

        match outcome {
            Ok(_) => Ok(GeneratedImage {
                result_ref,
                mode: TryOnMode::Generated,
            }),
            Err(GenerationError::NotConfigured) => {
                tracing::warn!(
                    session_id = %session_id,
                    "Generator not configured, using garment image"
                );
                Ok(GeneratedImage {
                    result_ref: garment_ref.to_string(),
                    mode: TryOnMode::Placeholder,
                })
            }
            Err(err) => Err(AppError::GenerationFailed(err.to_string())),
        }
    }

    /// Generates and records one try-on. Nothing is written unless generation succeeds,
    /// and a generated file is removed again if recording fails.
    pub async fn run(
        &self,
        session: &CustomerSession,
        item: &ClothingItem,
    ) -> Result<TryOnResponse, AppError> {
        let photo_ref = session
            .photo_ref
            .as_deref()
            .ok_or_else(|| AppError::PhotoRequired(PHOTO_REQUIRED_MESSAGE.into()))?;

        let generated = self.generate(session.id, photo_ref, &item.image_ref).await?;

        let history = TryOnHistory::new(
            session.id,
            item.id,
            session.store_id,
            generated.result_ref.clone(),
            self.clock.now(),
        );
        let log = self.usage_log.entry(
            session.store_id,
            UsageAction::TryOnGenerated,
            Some(json!({
                "session_id": session.id,
                "item_id": item.id,
                "mode": generated.mode.as_str(),
            })),
        );
        let try_on_count = match self.try_ons.record_try_on(&history, &log).await {
            Ok(count) => count,
            Err(err) => {
                if generated.mode == TryOnMode::Generated {
                    if let Err(cleanup) = self.storage.delete(&generated.result_ref).await {
                        tracing::warn!(
                            error = ?cleanup,
                            key = %generated.result_ref,
                            "Failed to remove unrecorded try-on result"
                        );
                    }
                }
                return Err(err);
            }
        };
        tracing::info!(
            store_id = %session.store_id,
            session_id = %session.id,
            item_id = %item.id,
            mode = generated.mode.as_str(),
            try_on_count,
            "Try-on recorded"
        );

        Ok(TryOnResponse {
            history_id: history.id,
            item_id: item.id,
            result_url: self.storage.public_url(&generated.result_ref),
            mode: generated.mode,
            try_on_count,
        })
    }
}
