use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    handlers::upload::{multipart_error, read_file, read_text, UploadedFile},
    models::clothing_item::{
        ClothingCategory, ClothingItemResponse, NewClothingItem, UpdateClothingItem,
    },
    services::Principal,
    state::AppState,
    types::ClothingItemId,
};

/// Multipart fields: `name`, `category`, optional `barcode`, and the `image` file.
pub async fn create_item(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ClothingItemResponse>), AppError> {
    let store_id = principal.managed_store()?;

    let mut name = None;
    let mut category = None;
    let mut barcode = None;
    let mut image: Option<UploadedFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(read_text(field).await?),
            Some("category") => {
                let raw = read_text(field).await?;
                let parsed = raw
                    .trim()
                    .parse::<ClothingCategory>()
                    .map_err(AppError::BadRequest)?;
                category = Some(parsed);
            }
            Some("barcode") => barcode = Some(read_text(field).await?),
            Some("image") => image = Some(read_file(field).await?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let category = category.ok_or_else(|| AppError::BadRequest("category is required".into()))?;
    let image = image.ok_or_else(|| AppError::BadRequest("image is required".into()))?;

    let item = state
        .inventory()
        .create(
            store_id,
            NewClothingItem {
                name,
                category,
                barcode,
                image: image.bytes,
                content_type: image.content_type,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_items(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<ClothingItemResponse>>, AppError> {
    let store_id = principal.managed_store()?;
    Ok(Json(state.inventory().list(store_id).await?))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ClothingItemId>,
    Json(payload): Json<UpdateClothingItem>,
) -> Result<Json<ClothingItemResponse>, AppError> {
    let store_id = principal.managed_store()?;
    Ok(Json(state.inventory().update(store_id, id, payload).await?))
}
