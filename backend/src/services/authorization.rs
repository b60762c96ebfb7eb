//! Bearer-token verification and role scoping for staff routes.

use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::{User, UserRole},
    repositories::UserRepository,
    types::{StoreId, UserId},
    utils::{
        jwt::{verify_access_token, Claims},
        Clock,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient permissions")]
    Forbidden,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::Forbidden => AppError::Forbidden(err.to_string()),
        }
    }
}

/// The authenticated staff member behind a request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub store_id: Option<StoreId>,
    pub password_reset_required: bool,
}

impl Principal {
    /// The store a manager is bound to.
    pub fn managed_store(&self) -> Result<StoreId, AppError> {
        match (self.role, self.store_id) {
            (UserRole::Manager, Some(store_id)) => Ok(store_id),
            _ => Err(AuthError::Forbidden.into()),
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            store_id: user.store_id,
            password_reset_required: user.password_reset_required,
        }
    }
}

pub fn parse_bearer_token(header: &str) -> Option<&str> {
    if let Some(rest) = header.strip_prefix("Bearer ") {
        return Some(rest);
    }
    if let Some(space_idx) = header.find(' ') {
        let (scheme, rest) = header.split_at(space_idx);
        if scheme.eq_ignore_ascii_case("bearer") {
            return Some(rest.trim_start());
        }
    }
    None
}

/// Role requirement. Users still holding an issued temporary password pass no role check.
pub fn check_role(principal: &Principal, required: UserRole) -> Result<(), AuthError> {
    if principal.role != required || principal.password_reset_required {
        return Err(AuthError::Forbidden);
    }
    if required == UserRole::Manager && principal.store_id.is_none() {
        return Err(AuthError::Forbidden);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthorizationGate {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    clock: Arc<dyn Clock>,
}

impl AuthorizationGate {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_secret: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
            clock,
        }
    }

    /// Checks signature and expiry of the `Authorization` header value.
    pub fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let header = authorization
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let token = parse_bearer_token(header)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidToken)?;
        verify_access_token(token, &self.jwt_secret, self.clock.now())
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies the token, reloads the user and applies the optional role requirement.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required_role: Option<UserRole>,
    ) -> Result<Principal, AppError> {
        let claims = self.verify(authorization)?;
        let user = self
            .users
            .find_by_id(claims.id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::InvalidToken)?;

        let principal = Principal::from(&user);
        if let Some(required) = required_role {
            if let Err(err) = check_role(&principal, required) {
                tracing::warn!(
                    user_id = %principal.id,
                    role = principal.role.as_str(),
                    required = required.as_str(),
                    "Role check failed"
                );
                return Err(err.into());
            }
        }
        Ok(principal)
    }
}
