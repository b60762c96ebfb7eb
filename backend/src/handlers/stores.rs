use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::store::{
        CreateStoreRequest, ManagerPasswordResetResponse, ProvisionedStoreResponse, Store,
        UpdateStoreRequest,
    },
    state::AppState,
    types::StoreId,
};

pub async fn create_store(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<ProvisionedStoreResponse>), AppError> {
    payload.validate()?;
    let provisioned = state.store_service().provision(payload).await?;
    Ok((StatusCode::CREATED, Json(provisioned)))
}

pub async fn list_stores(State(state): State<AppState>) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(state.store_service().list().await?))
}

pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Json(payload): Json<UpdateStoreRequest>,
) -> Result<Json<Store>, AppError> {
    payload.validate()?;
    Ok(Json(state.store_service().update(id, payload).await?))
}

pub async fn reset_manager_password(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Result<Json<ManagerPasswordResetResponse>, AppError> {
    Ok(Json(state.store_service().reset_manager_password(id).await?))
}
