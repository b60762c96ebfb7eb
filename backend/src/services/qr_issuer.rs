//! Issues time-boxed QR access grants for a manager's store.

use std::sync::Arc;

use serde_json::json;

use crate::{
    error::AppError,
    models::{
        qr_session::{IssuedQrSessionResponse, QrSession, QrSessionSummary},
        usage_log::UsageAction,
    },
    repositories::QrSessionRepository,
    services::usage_log::UsageLogService,
    types::StoreId,
    utils::{qr::render_qr_svg, token::generate_qr_token, Clock},
};

#[derive(Clone)]
pub struct QrSessionIssuer {
    qr_sessions: Arc<dyn QrSessionRepository>,
    usage_log: UsageLogService,
    clock: Arc<dyn Clock>,
    public_base_url: String,
}

impl QrSessionIssuer {
    pub fn new(
        qr_sessions: Arc<dyn QrSessionRepository>,
        usage_log: UsageLogService,
        clock: Arc<dyn Clock>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            qr_sessions,
            usage_log,
            clock,
            public_base_url: public_base_url.into(),
        }
    }

    pub fn redemption_url(&self, token: &str) -> String {
        format!("{}/try-on?token={}", self.public_base_url, token)
    }

    pub async fn issue(&self, store_id: StoreId) -> Result<IssuedQrSessionResponse, AppError> {
        let grant = QrSession::new(store_id, generate_qr_token(), self.clock.now());
        self.qr_sessions.create(&grant).await?;
        self.usage_log
            .record(
                store_id,
                UsageAction::QrSessionIssued,
                Some(json!({ "qr_session_id": grant.id, "expires_at": grant.expires_at })),
            )
            .await?;
        tracing::info!(
            store_id = %store_id,
            qr_session_id = %grant.id,
            expires_at = %grant.expires_at,
            "QR session issued"
        );

        let url = self.redemption_url(&grant.token);
        let qr_svg = render_qr_svg(&url)?;
        Ok(IssuedQrSessionResponse {
            id: grant.id,
            token: grant.token,
            expires_at: grant.expires_at,
            url,
            qr_svg,
        })
    }

    pub async fn list(&self, store_id: StoreId) -> Result<Vec<QrSessionSummary>, AppError> {
        let now = self.clock.now();
        let grants = self.qr_sessions.list_by_store(store_id).await?;
        Ok(grants
            .into_iter()
            .map(|grant| QrSessionSummary::from_session(grant, now))
            .collect())
    }
}
