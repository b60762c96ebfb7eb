use axum::{
    extract::{Extension, Query, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        usage_log::{UsageLogQuery, UsageLogResponse},
        user::UserRole,
    },
    services::{AuthError, Principal},
    state::AppState,
};

/// Owners may read any store's log; managers are pinned to their own store.
pub async fn list_usage_logs(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<UsageLogQuery>,
) -> Result<Json<Vec<UsageLogResponse>>, AppError> {
    if principal.password_reset_required {
        return Err(AuthError::Forbidden.into());
    }
    let store_id = match principal.role {
        UserRole::Owner => query.store_id,
        UserRole::Manager => {
            let own = principal.managed_store()?;
            if query.store_id.is_some_and(|requested| requested != own) {
                return Err(AuthError::Forbidden.into());
            }
            Some(own)
        }
    };
    let logs = state.usage_log().list(store_id, query.limit()).await?;
    Ok(Json(logs))
}
