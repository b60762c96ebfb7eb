//! Append-only audit trail of tenant activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};

use crate::types::{StoreId, UsageLogId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageAction {
    StoreCreated,
    StoreUpdated,
    ManagerPasswordReset,
    ItemCreated,
    ItemUpdated,
    QrSessionIssued,
    CustomerSessionCreated,
    PhotoUploaded,
    TryOnGenerated,
}

impl UsageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageAction::StoreCreated => "store_created",
            UsageAction::StoreUpdated => "store_updated",
            UsageAction::ManagerPasswordReset => "manager_password_reset",
            UsageAction::ItemCreated => "item_created",
            UsageAction::ItemUpdated => "item_updated",
            UsageAction::QrSessionIssued => "qr_session_issued",
            UsageAction::CustomerSessionCreated => "customer_session_created",
            UsageAction::PhotoUploaded => "photo_uploaded",
            UsageAction::TryOnGenerated => "try_on_generated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsageLog {
    pub id: UsageLogId,
    pub store_id: StoreId,
    pub action: String,
    pub metadata: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
}

impl UsageLog {
    pub fn new(
        store_id: StoreId,
        action: UsageAction,
        metadata: Option<Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UsageLogId::new(),
            store_id,
            action: action.as_str().to_string(),
            metadata: metadata.map(Json),
            created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UsageLogQuery {
    /// Owners may filter by any store; managers are pinned to their own.
    pub store_id: Option<StoreId>,
    /// Maximum rows (default 100, max 1000).
    pub limit: Option<i64>,
}

impl UsageLogQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 1000)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsageLogResponse {
    pub id: UsageLogId,
    pub store_id: StoreId,
    pub action: String,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<UsageLog> for UsageLogResponse {
    fn from(log: UsageLog) -> Self {
        Self {
            id: log.id,
            store_id: log.store_id,
            action: log.action,
            metadata: log.metadata.map(|Json(value)| value),
            created_at: log.created_at,
        }
    }
}
