//! QR access grants issued by managers for their own store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{QrSessionId, StoreId};

/// Lifetime of a QR grant. Fixed, not configurable.
pub const QR_SESSION_TTL_MINUTES: i64 = 60;

pub fn qr_session_ttl() -> Duration {
    Duration::minutes(QR_SESSION_TTL_MINUTES)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Immutable after creation. Redeeming it does not consume it.
pub struct QrSession {
    pub id: QrSessionId,
    pub store_id: StoreId,
    /// Opaque hex token, 256 bits from the OS CSPRNG.
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl QrSession {
    pub fn new(store_id: StoreId, token: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: QrSessionId::new(),
            store_id,
            token,
            created_at: issued_at,
            expires_at: issued_at + qr_session_ttl(),
        }
    }

    /// A grant can mint customer sessions strictly before its expiry instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Response to a manager issuing a new grant.
pub struct IssuedQrSessionResponse {
    pub id: QrSessionId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Redemption URL encoded in the QR code.
    pub url: String,
    /// SVG rendering of `url`.
    pub qr_svg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QrSessionSummary {
    pub id: QrSessionId,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl QrSessionSummary {
    pub fn from_session(session: QrSession, now: DateTime<Utc>) -> Self {
        let is_active = session.is_valid_at(now);
        Self {
            id: session.id,
            token: session.token,
            created_at: session.created_at,
            expires_at: session.expires_at,
            is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_expires_exactly_one_hour_after_issue() {
        let issued_at = Utc::now();
        let grant = QrSession::new(StoreId::new(), "t".into(), issued_at);
        assert_eq!(grant.expires_at - issued_at, Duration::hours(1));
    }

    #[test]
    fn validity_boundary_is_exclusive() {
        let issued_at = Utc::now();
        let grant = QrSession::new(StoreId::new(), "t".into(), issued_at);
        assert!(grant.is_valid_at(grant.expires_at - Duration::seconds(1)));
        assert!(!grant.is_valid_at(grant.expires_at));
        assert!(!grant.is_valid_at(grant.expires_at + Duration::seconds(1)));
    }
}
