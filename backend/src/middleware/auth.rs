use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, models::user::UserRole, state::AppState};

pub async fn auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(state, request, next, None).await
}

// Auth + owner role
pub async fn auth_owner(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(state, request, next, Some(UserRole::Owner)).await
}

// Auth + manager role bound to a store
pub async fn auth_manager(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authenticate(state, request, next, Some(UserRole::Manager)).await
}

async fn authenticate(
    state: AppState,
    mut request: Request,
    next: Next,
    required_role: Option<UserRole>,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned());

    let principal = state
        .gate()
        .authorize(auth_header.as_deref(), required_role)
        .await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
