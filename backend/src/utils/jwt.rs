use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::models::user::{User, UserRole};
use crate::types::{StoreId, UserId};

/// Staff bearer tokens live for a fixed 24 hours.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    pub exp: i64, // expiration time
    pub iat: i64, // issued at
}

impl Claims {
    pub fn for_user(user: &User, issued_at: DateTime<Utc>) -> Self {
        let exp = issued_at + Duration::hours(ACCESS_TOKEN_TTL_HOURS);
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            store_id: user.store_id,
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

pub fn encode_claims(claims: &Claims, secret: &str) -> anyhow::Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn create_access_token(user: &User, secret: &str) -> anyhow::Result<String> {
    encode_claims(&Claims::for_user(user, Utc::now()), secret)
}

/// Checks the HS256 signature, then rejects the token once `now` reaches `exp`.
/// No leeway is granted.
pub fn verify_access_token(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.leeway = 0;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    if token_data.claims.exp <= now.timestamp() {
        return Err(ErrorKind::ExpiredSignature.into());
    }
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> User {
        User::new(
            "bob@example.com".into(),
            "hash".into(),
            UserRole::Manager,
            Some(StoreId::new()),
            false,
        )
    }

    #[test]
    fn create_and_verify_carries_role_and_store() {
        let user = manager();
        let token = create_access_token(&user, "secret").expect("create token");
        let claims = verify_access_token(&token, "secret", Utc::now()).expect("verify token");
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "bob@example.com");
        assert_eq!(claims.role, UserRole::Manager);
        assert_eq!(claims.store_id, user.store_id);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token(&manager(), "secret").unwrap();
        assert!(verify_access_token(&token, "other-secret", Utc::now()).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims::for_user(&manager(), Utc::now() - Duration::hours(48));
        let token = encode_claims(&claims, "secret").unwrap();
        assert!(verify_access_token(&token, "secret", Utc::now()).is_err());
    }

    #[test]
    fn token_is_rejected_seconds_after_expiry() {
        let now = Utc::now();
        let issued = now - Duration::hours(ACCESS_TOKEN_TTL_HOURS) - Duration::seconds(30);
        let token = encode_claims(&Claims::for_user(&manager(), issued), "secret").unwrap();
        let err = verify_access_token(&token, "secret", now).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ExpiredSignature);
    }

    #[test]
    fn expiry_is_exact_to_the_second() {
        let issued = Utc::now() - Duration::hours(1);
        let claims = Claims::for_user(&manager(), issued);
        let exp = DateTime::from_timestamp(claims.exp, 0).unwrap();
        let token = encode_claims(&claims, "secret").unwrap();

        assert!(verify_access_token(&token, "secret", exp - Duration::seconds(1)).is_ok());
        assert!(verify_access_token(&token, "secret", exp).is_err());
    }

    #[test]
    fn verification_follows_the_supplied_instant() {
        let now = Utc::now();
        let token = encode_claims(&Claims::for_user(&manager(), now), "secret").unwrap();
        assert!(verify_access_token(&token, "secret", now + Duration::hours(23)).is_ok());
        assert!(verify_access_token(&token, "secret", now + Duration::hours(25)).is_err());
    }
}
