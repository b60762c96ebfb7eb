//! Exchanges a QR token for a fresh customer session.

use std::sync::Arc;

use serde_json::json;

use crate::{
    error::AppError,
    models::{
        customer_session::{CustomerSession, CustomerSessionView},
        usage_log::UsageAction,
    },
    repositories::{CustomerSessionRepository, QrSessionRepository, StoreRepository},
    services::usage_log::UsageLogService,
    utils::Clock,
};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please scan the QR code again";

#[derive(Clone)]
pub struct SessionValidator {
    qr_sessions: Arc<dyn QrSessionRepository>,
    stores: Arc<dyn StoreRepository>,
    customer_sessions: Arc<dyn CustomerSessionRepository>,
    usage_log: UsageLogService,
    clock: Arc<dyn Clock>,
}

impl SessionValidator {
    pub fn new(
        qr_sessions: Arc<dyn QrSessionRepository>,
        stores: Arc<dyn StoreRepository>,
        customer_sessions: Arc<dyn CustomerSessionRepository>,
        usage_log: UsageLogService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            qr_sessions,
            stores,
            customer_sessions,
            usage_log,
            clock,
        }
    }

    /// Every successful call mints a new customer session; the grant stays usable
    /// until it expires.
    pub async fn validate(&self, token: &str) -> Result<CustomerSessionView, AppError> {
        let now = self.clock.now();
        let grant = self
            .qr_sessions
            .find_by_token(token.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid QR code".into()))?;

        if !grant.is_valid_at(now) {
            tracing::warn!(qr_session_id = %grant.id, "Rejected expired QR session");
            return Err(AppError::Expired(SESSION_EXPIRED_MESSAGE.into()));
        }

        let store = self
            .stores
            .find_by_id(grant.store_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid QR code".into()))?;
        if !store.is_active {
            tracing::warn!(store_id = %store.id, "Rejected QR session for inactive store");
            return Err(AppError::Forbidden(
                "This store is currently unavailable".into(),
            ));
        }

        let session = CustomerSession::new(grant.id, store.id, grant.expires_at, now);
        self.customer_sessions.create(&session).await?;
        self.usage_log
            .record(
                store.id,
                UsageAction::CustomerSessionCreated,
                Some(json!({ "session_id": session.id, "qr_session_id": grant.id })),
            )
            .await?;
        tracing::info!(
            store_id = %store.id,
            session_id = %session.id,
            qr_session_id = %grant.id,
            "Customer session created"
        );

        Ok(CustomerSessionView {
            session_id: session.id,
            store_id: store.id,
            store_name: store.name,
            expires_at: session.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{qr_session::QrSession, store::Store, user::{User, UserRole}};
    use crate::repositories::MemoryStore;
    use crate::utils::ManualClock;
    use chrono::{Duration, Utc};

    struct Fixture {
        memory: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        validator: SessionValidator,
        store: Store,
        grant: QrSession,
    }

    async fn fixture() -> Fixture {
        let memory = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Store::new("Corner Boutique".into(), None);
        let manager = User::new(
            "m@corner.test".into(),
            "hash".into(),
            UserRole::Manager,
            Some(store.id),
            false,
        );
        memory.create_with_manager(&store, &manager).await.unwrap();
        let grant = QrSession::new(store.id, "a".repeat(64), clock.now());
        QrSessionRepository::create(memory.as_ref(), &grant).await.unwrap();

        let validator = SessionValidator::new(
            memory.clone(),
            memory.clone(),
            memory.clone(),
            UsageLogService::new(memory.clone(), clock.clone()),
            clock.clone(),
        );
        Fixture {
            memory,
            clock,
            validator,
            store,
            grant,
        }
    }

    #[tokio::test]
    async fn session_inherits_grant_expiry_verbatim() {
        let f = fixture().await;
        f.clock.advance(Duration::minutes(59));
        let view = f.validator.validate(&f.grant.token).await.unwrap();
        assert_eq!(view.expires_at, f.grant.expires_at);
        assert_eq!(view.store_name, "Corner Boutique");

        let stored = CustomerSessionRepository::find_by_id(f.memory.as_ref(), view.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.expires_at, f.grant.expires_at);
        assert_eq!(stored.qr_session_id, f.grant.id);
    }

    #[tokio::test]
    async fn repeated_redemption_creates_distinct_sessions() {
        let f = fixture().await;
        let first = f.validator.validate(&f.grant.token).await.unwrap();
        let second = f.validator.validate(&f.grant.token).await.unwrap();
        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn grant_is_rejected_at_and_after_expiry() {
        let f = fixture().await;
        f.clock.set(f.grant.expires_at);
        let err = f.validator.validate(&f.grant.token).await.unwrap_err();
        match err {
            AppError::Expired(msg) => assert_eq!(msg, SESSION_EXPIRED_MESSAGE),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let f = fixture().await;
        let err = f.validator.validate("deadbeef").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn inactive_store_rejects_redemption() {
        let f = fixture().await;
        let mut store = f.store.clone();
        store.is_active = false;
        StoreRepository::update(f.memory.as_ref(), &store).await.unwrap();

        let err = f.validator.validate(&f.grant.token).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
