use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::upload::{multipart_error, read_file},
    models::{
        clothing_item::{ClothingItemResponse, ItemListQuery},
        customer_session::CustomerSessionStatus,
        try_on::TryOnHistoryResponse,
    },
    state::AppState,
    types::{CustomerSessionId, StoreId},
};

pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<CustomerSessionId>,
) -> Result<Json<CustomerSessionStatus>, AppError> {
    Ok(Json(state.customer_sessions().status(id).await?))
}

/// Multipart field `photo`.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<CustomerSessionId>,
    mut multipart: Multipart,
) -> Result<Json<CustomerSessionStatus>, AppError> {
    let mut photo = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        if field_name.as_deref() == Some("photo") {
            photo = Some(read_file(field).await?);
        }
    }
    let photo = photo.ok_or_else(|| AppError::BadRequest("photo is required".into()))?;

    let status = state
        .customer_sessions()
        .upload_photo(id, &photo.content_type, &photo.bytes)
        .await?;
    Ok(Json(status))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<CustomerSessionId>,
) -> Result<Json<Vec<TryOnHistoryResponse>>, AppError> {
    Ok(Json(state.customer_sessions().history(id).await?))
}

pub async fn list_store_items(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<ClothingItemResponse>>, AppError> {
    let items = state
        .customer_sessions()
        .list_available_items(id, query.category)
        .await?;
    Ok(Json(items))
}
