use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{ChangePasswordRequest, LoginRequest, LoginResponse, UserResponse},
    services::Principal,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let response = state.auth_service().login(payload).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.auth_service().me(&principal).await?))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;
    state
        .auth_service()
        .change_password(&principal, payload)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}
