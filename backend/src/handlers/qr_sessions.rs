use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        customer_session::CustomerSessionView,
        qr_session::{IssuedQrSessionResponse, QrSessionSummary},
    },
    services::Principal,
    state::AppState,
};

pub async fn issue_session(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<(StatusCode, Json<IssuedQrSessionResponse>), AppError> {
    let store_id = principal.managed_store()?;
    let issued = state.qr_issuer().issue(store_id).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<QrSessionSummary>>, AppError> {
    let store_id = principal.managed_store()?;
    Ok(Json(state.qr_issuer().list(store_id).await?))
}

/// Customer-facing: redeems a scanned QR token.
pub async fn redeem_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<CustomerSessionView>), AppError> {
    let view = state.session_validator().validate(&token).await?;
    Ok((StatusCode::CREATED, Json(view)))
}
