//! Ephemeral, anonymous customer sessions created by redeeming a QR grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{CustomerSessionId, QrSessionId, StoreId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Expiry is copied from the originating grant and never extended. There is no stored
/// "expired" state: liveness is evaluated against the clock on every access.
pub struct CustomerSession {
    pub id: CustomerSessionId,
    pub qr_session_id: QrSessionId,
    pub store_id: StoreId,
    /// Storage key of the customer's uploaded photo.
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CustomerSession {
    pub fn new(
        qr_session_id: QrSessionId,
        store_id: StoreId,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CustomerSessionId::new(),
            qr_session_id,
            store_id,
            photo_ref: None,
            created_at,
            expires_at,
        }
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// What a customer receives after redeeming a QR token.
pub struct CustomerSessionView {
    pub session_id: CustomerSessionId,
    pub store_id: StoreId,
    pub store_name: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSessionStatus {
    pub session_id: CustomerSessionId,
    pub store_id: StoreId,
    pub expires_at: DateTime<Utc>,
    pub has_photo: bool,
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_session_has_no_photo_and_keeps_given_expiry() {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(17);
        let session = CustomerSession::new(QrSessionId::new(), StoreId::new(), expires_at, now);
        assert!(session.photo_ref.is_none());
        assert_eq!(session.expires_at, expires_at);
        assert!(session.is_live_at(now));
        assert!(!session.is_live_at(expires_at));
    }
}
