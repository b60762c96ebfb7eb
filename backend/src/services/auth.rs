//! Staff credential flows: login, password change and owner bootstrap.

use std::sync::Arc;

use crate::{
    error::AppError,
    models::user::{ChangePasswordRequest, LoginRequest, LoginResponse, User, UserResponse, UserRole},
    repositories::UserRepository,
    services::authorization::Principal,
    utils::{
        hash_password, jwt::encode_claims, verify_password, Claims, Clock, ACCESS_TOKEN_TTL_HOURS,
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    clock: Arc<dyn Clock>,
}

impl AuthService {
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

    pub async fn login(&self, payload: LoginRequest) -> Result<LoginResponse, AppError> {
        let email = payload.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !verify_password(&payload.password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let claims = Claims::for_user(&user, self.clock.now());
        let access_token = encode_claims(&claims, &self.jwt_secret)?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".into(),
            expires_in: ACCESS_TOKEN_TTL_HOURS * 3600,
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, principal: &Principal) -> Result<UserResponse, AppError> {
        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        Ok(UserResponse::from(user))
    }

    /// Verifies the current password and clears any forced-reset flag.
    pub async fn change_password(
        &self,
        principal: &Principal,
        payload: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        if payload.new_password == payload.current_password {
            return Err(AppError::BadRequest(
                "New password must differ from current password".into(),
            ));
        }
        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if !verify_password(&payload.current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Current password is incorrect".into()));
        }

        let new_hash = hash_password(&payload.new_password)?;
        self.users.update_password(user.id, &new_hash, false).await?;
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Creates the owner account if no user with that email exists yet.
    pub async fn ensure_owner(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        let owner = User::new(email, hash_password(password)?, UserRole::Owner, None, false);
        self.users.create(&owner).await?;
        tracing::info!(user_id = %owner.id, "Owner account bootstrapped");
        Ok(true)
    }
}
