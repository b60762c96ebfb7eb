use std::sync::Arc;

use crate::{
    config::Config,
    repositories::Repositories,
    services::{
        AuthService, AuthorizationGate, CustomerSessionManager, ImageGenerator, InventoryService,
        PhotoCleanupService, QrSessionIssuer, SessionValidator, StoreService, TryOnOrchestrator,
        UsageLogService,
    },
    utils::{storage::FileStorage, Clock},
};

/// Shared handles for every request. Services are cheap views built on demand.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repos: Repositories,
    pub clock: Arc<dyn Clock>,
    pub storage: FileStorage,
    pub generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(
        config: Config,
        repos: Repositories,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        let storage = FileStorage::new(config.upload_dir.clone());
        Self {
            config,
            repos,
            clock,
            storage,
            generator,
        }
    }

    pub fn usage_log(&self) -> UsageLogService {
        UsageLogService::new(self.repos.usage_logs.clone(), self.clock.clone())
    }

    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(
            self.repos.users.clone(),
            self.config.jwt_secret.clone(),
            self.clock.clone(),
        )
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.repos.users.clone(),
            self.config.jwt_secret.clone(),
            self.clock.clone(),
        )
    }

    pub fn store_service(&self) -> StoreService {
        StoreService::new(
            self.repos.stores.clone(),
            self.repos.users.clone(),
            self.usage_log(),
        )
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(
            self.repos.items.clone(),
            self.storage.clone(),
            self.usage_log(),
        )
    }

    pub fn qr_issuer(&self) -> QrSessionIssuer {
        QrSessionIssuer::new(
            self.repos.qr_sessions.clone(),
            self.usage_log(),
            self.clock.clone(),
            self.config.public_base_url.clone(),
        )
    }

    pub fn session_validator(&self) -> SessionValidator {
        SessionValidator::new(
            self.repos.qr_sessions.clone(),
            self.repos.stores.clone(),
            self.repos.customer_sessions.clone(),
            self.usage_log(),
            self.clock.clone(),
        )
    }

    pub fn orchestrator(&self) -> TryOnOrchestrator {
        TryOnOrchestrator::new(
            self.generator.clone(),
            self.storage.clone(),
            self.repos.try_ons.clone(),
            self.usage_log(),
            self.clock.clone(),
        )
    }

    pub fn customer_sessions(&self) -> CustomerSessionManager {
        CustomerSessionManager::new(
            self.repos.customer_sessions.clone(),
            self.repos.items.clone(),
            self.repos.try_ons.clone(),
            self.orchestrator(),
            self.storage.clone(),
            self.usage_log(),
            self.clock.clone(),
        )
    }

    pub fn photo_cleanup(&self) -> PhotoCleanupService {
        PhotoCleanupService::new(self.repos.customer_sessions.clone(), self.storage.clone())
    }
}
