//! Models that represent staff users, authentication payloads, and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{pg_text_enum, StoreId, UserId};

#[derive(Debug, Clone, FromRow)]
/// Database representation of a staff account (owner or store manager).
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2 hash of the user's password.
    pub password_hash: String,
    /// Role describing the user's privileges.
    pub role: UserRole,
    /// Store a manager is bound to; always `None` for owners.
    pub store_id: Option<StoreId>,
    /// Set when the password was issued by someone else and must be changed on next login.
    pub password_reset_required: bool,
    /// Inactive users cannot authenticate.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "snake_case")]
/// Supported staff roles stored in the database.
pub enum UserRole {
    /// Company owner; manages stores and their managers.
    Owner,
    /// Manager of exactly one store.
    Manager,
}

impl UserRole {
    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Manager => "manager",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(UserRole::Owner),
            "manager" => Ok(UserRole::Manager),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

pg_text_enum!(UserRole);

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "owner" => Ok(UserRole::Owner),
            "manager" => Ok(UserRole::Manager),
            // tolerate common legacy casings
            "Owner" | "OWNER" => Ok(UserRole::Owner),
            "Manager" | "MANAGER" => Ok(UserRole::Manager),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["owner", "manager"],
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Credentials submitted by a staff member attempting to authenticate.
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Payload submitted when a user changes their password.
pub struct ChangePasswordRequest {
    /// Existing password that will be verified before applying the change.
    pub current_password: String,
    /// Replacement password that will be stored if verification succeeds.
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Bearer token returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub store_id: Option<StoreId>,
    pub password_reset_required: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            role: user.role,
            store_id: user.store_id,
            password_reset_required: user.password_reset_required,
        }
    }
}

impl User {
    /// Constructs a new active user with a freshly generated identifier.
    pub fn new(
        email: String,
        password_hash: String,
        role: UserRole,
        store_id: Option<StoreId>,
        password_reset_required: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            role,
            store_id,
            password_reset_required,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self.role, UserRole::Owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn user_role_serde_accepts_and_emits_snake_case() {
        let o: UserRole = serde_json::from_str("\"owner\"").unwrap();
        let m: UserRole = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(o, UserRole::Owner);
        assert_eq!(m, UserRole::Manager);

        assert_eq!(
            serde_json::to_value(UserRole::Manager).unwrap(),
            Value::String("manager".into())
        );
        assert!(serde_json::from_str::<UserRole>("\"customer\"").is_err());
    }

    #[test]
    fn user_response_hides_password_hash() {
        let user = User::new(
            "manager@example.com".into(),
            "hash".into(),
            UserRole::Manager,
            Some(StoreId::new()),
            true,
        );
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "manager");
        assert_eq!(json["password_reset_required"], true);
    }

    #[test]
    fn login_request_requires_email_shape() {
        let request = LoginRequest {
            email: "not-an-email".into(),
            password: "pw".into(),
        };
        assert!(request.validate().is_err());
    }
}
