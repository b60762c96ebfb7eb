use axum::{extract::State, Json};

use crate::{
    error::AppError,
    models::try_on::{TryOnRequest, TryOnResponse},
    state::AppState,
};

pub async fn request_try_on(
    State(state): State<AppState>,
    Json(payload): Json<TryOnRequest>,
) -> Result<Json<TryOnResponse>, AppError> {
    let response = state
        .customer_sessions()
        .request_try_on(payload.session_id, payload.item_id)
        .await?;
    Ok(Json(response))
}
