//! Stores are the tenancy root: every other scoped record carries a store id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::UserResponse;
use crate::types::StoreId;
use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub description: Option<String>,
    /// Inactive stores reject new customer sessions.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StoreId::new(),
            name,
            description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Owner payload; creating a store also provisions its manager account.
pub struct CreateStoreRequest {
    #[validate(length(min = 1, max = 120), custom(function = "rules::validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(email)]
    pub manager_email: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStoreRequest {
    #[validate(length(min = 1, max = 120), custom(function = "rules::validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Returned once; the temporary password is never retrievable again.
pub struct ProvisionedStoreResponse {
    pub store: Store,
    pub manager: UserResponse,
    pub temporary_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManagerPasswordResetResponse {
    pub manager: UserResponse,
    pub temporary_password: String,
}
