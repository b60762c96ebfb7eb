use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{ClothingItemId, CustomerSessionId, StoreId, TryOnHistoryId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Append-only: one row per successful (or placeholder) generation.
pub struct TryOnHistory {
    pub id: TryOnHistoryId,
    pub customer_session_id: CustomerSessionId,
    pub clothing_item_id: ClothingItemId,
    pub store_id: StoreId,
    /// Storage key of the composited (or placeholder) image.
    pub result_ref: String,
    pub created_at: DateTime<Utc>,
}

impl TryOnHistory {
    pub fn new(
        customer_session_id: CustomerSessionId,
        clothing_item_id: ClothingItemId,
        store_id: StoreId,
        result_ref: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TryOnHistoryId::new(),
            customer_session_id,
            clothing_item_id,
            store_id,
            result_ref,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TryOnMode {
    /// The external generator produced a composite.
    Generated,
    /// No generator credential; the garment image stands in for the result.
    Placeholder,
}

impl TryOnMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnMode::Generated => "generated",
            TryOnMode::Placeholder => "placeholder",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TryOnRequest {
    pub session_id: CustomerSessionId,
    pub item_id: ClothingItemId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TryOnResponse {
    pub history_id: TryOnHistoryId,
    pub item_id: ClothingItemId,
    pub result_url: String,
    pub mode: TryOnMode,
    pub try_on_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TryOnHistoryResponse {
    pub id: TryOnHistoryId,
    pub item_id: ClothingItemId,
    pub result_url: String,
    pub created_at: DateTime<Utc>,
}
