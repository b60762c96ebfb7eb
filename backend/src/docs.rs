#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use serde::Serialize;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::{
    error::ErrorResponse,
    handlers::{auth::MessageResponse, health::HealthResponse},
    models::{
        clothing_item::{ClothingCategory, ClothingItemResponse, ItemListQuery, UpdateClothingItem},
        customer_session::{CustomerSessionStatus, CustomerSessionView},
        qr_session::{IssuedQrSessionResponse, QrSessionSummary},
        store::{
            CreateStoreRequest, ManagerPasswordResetResponse, ProvisionedStoreResponse, Store,
            UpdateStoreRequest,
        },
        try_on::{TryOnHistoryResponse, TryOnMode, TryOnRequest, TryOnResponse},
        usage_log::{UsageLogQuery, UsageLogResponse},
        user::{ChangePasswordRequest, LoginRequest, LoginResponse, UserResponse, UserRole},
    },
};

/// Multipart body of `POST /api/items`.
#[derive(Serialize, ToSchema)]
pub struct ItemUploadForm {
    pub name: String,
    pub category: ClothingCategory,
    pub barcode: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Multipart body of `POST /api/customer-sessions/{id}/photo`.
#[derive(Serialize, ToSchema)]
pub struct PhotoUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_doc,
        login_doc,
        me_doc,
        change_password_doc,
        create_store_doc,
        list_stores_doc,
        update_store_doc,
        reset_manager_password_doc,
        create_item_doc,
        list_items_doc,
        update_item_doc,
        issue_session_doc,
        list_sessions_doc,
        redeem_session_doc,
        customer_session_status_doc,
        upload_photo_doc,
        customer_session_history_doc,
        list_store_items_doc,
        try_on_doc,
        list_usage_logs_doc
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            MessageResponse,
            // auth
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            UserResponse,
            UserRole,
            // stores
            Store,
            CreateStoreRequest,
            UpdateStoreRequest,
            ProvisionedStoreResponse,
            ManagerPasswordResetResponse,
            // items
            ClothingCategory,
            ClothingItemResponse,
            UpdateClothingItem,
            ItemUploadForm,
            // sessions
            IssuedQrSessionResponse,
            QrSessionSummary,
            CustomerSessionView,
            CustomerSessionStatus,
            PhotoUploadForm,
            // try-on
            TryOnRequest,
            TryOnResponse,
            TryOnMode,
            TryOnHistoryResponse,
            UsageLogResponse
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Staff login and password management"),
        (name = "Stores", description = "Owner store management"),
        (name = "Items", description = "Manager inventory"),
        (name = "Sessions", description = "QR grants and customer sessions"),
        (name = "TryOn", description = "Virtual try-on"),
        (name = "Usage", description = "Usage audit log")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, body = HealthResponse)),
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Current user", body = UserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed; clears the forced-reset flag", body = MessageResponse),
        (status = 401, description = "Current password is incorrect", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn change_password_doc() {}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store and manager created", body = ProvisionedStoreResponse),
        (status = 409, description = "Manager email already registered", body = ErrorResponse)
    ),
    tag = "Stores"
)]
fn create_store_doc() {}

#[utoipa::path(
    get,
    path = "/api/stores",
    responses((status = 200, body = [Store])),
    tag = "Stores"
)]
fn list_stores_doc() {}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(("id" = String, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses((status = 200, body = Store), (status = 404, body = ErrorResponse)),
    tag = "Stores"
)]
fn update_store_doc() {}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/manager/reset-password",
    params(("id" = String, Path, description = "Store ID")),
    responses((status = 200, body = ManagerPasswordResetResponse)),
    tag = "Stores"
)]
fn reset_manager_password_doc() {}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body(content = ItemUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = ClothingItemResponse),
        (status = 409, description = "Barcode already used in this store", body = ErrorResponse)
    ),
    tag = "Items"
)]
fn create_item_doc() {}

#[utoipa::path(
    get,
    path = "/api/items",
    responses((status = 200, body = [ClothingItemResponse])),
    tag = "Items"
)]
fn list_items_doc() {}

#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(("id" = String, Path, description = "Clothing item ID")),
    request_body = UpdateClothingItem,
    responses((status = 200, body = ClothingItemResponse), (status = 404, body = ErrorResponse)),
    tag = "Items"
)]
fn update_item_doc() {}

#[utoipa::path(
    post,
    path = "/api/sessions",
    responses((status = 201, description = "QR grant valid for one hour", body = IssuedQrSessionResponse)),
    tag = "Sessions"
)]
fn issue_session_doc() {}

#[utoipa::path(
    get,
    path = "/api/sessions",
    responses((status = 200, body = [QrSessionSummary])),
    tag = "Sessions"
)]
fn list_sessions_doc() {}

#[utoipa::path(
    get,
    path = "/api/sessions/{token}",
    params(("token" = String, Path, description = "QR token")),
    responses(
        (status = 201, description = "New customer session", body = CustomerSessionView),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 410, description = "Grant expired", body = ErrorResponse),
        (status = 403, description = "Store inactive", body = ErrorResponse)
    ),
    tag = "Sessions",
    security(())
)]
fn redeem_session_doc() {}

#[utoipa::path(
    get,
    path = "/api/customer-sessions/{id}",
    params(("id" = String, Path, description = "Customer session ID")),
    responses((status = 200, body = CustomerSessionStatus), (status = 410, body = ErrorResponse)),
    tag = "Sessions",
    security(())
)]
fn customer_session_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/customer-sessions/{id}/photo",
    params(("id" = String, Path, description = "Customer session ID")),
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses((status = 200, body = CustomerSessionStatus), (status = 410, body = ErrorResponse)),
    tag = "Sessions",
    security(())
)]
fn upload_photo_doc() {}

#[utoipa::path(
    get,
    path = "/api/customer-sessions/{id}/history",
    params(("id" = String, Path, description = "Customer session ID")),
    responses((status = 200, body = [TryOnHistoryResponse])),
    tag = "Sessions",
    security(())
)]
fn customer_session_history_doc() {}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/items",
    params(("id" = String, Path, description = "Store ID"), ItemListQuery),
    responses((status = 200, description = "Available items", body = [ClothingItemResponse])),
    tag = "Items",
    security(())
)]
fn list_store_items_doc() {}

#[utoipa::path(
    post,
    path = "/api/tryon",
    request_body = TryOnRequest,
    responses(
        (status = 200, body = TryOnResponse),
        (status = 400, description = "No photo uploaded", body = ErrorResponse),
        (status = 404, description = "Session or item not found", body = ErrorResponse),
        (status = 410, description = "Session expired", body = ErrorResponse),
        (status = 502, description = "Generator failed", body = ErrorResponse)
    ),
    tag = "TryOn",
    security(())
)]
fn try_on_doc() {}

#[utoipa::path(
    get,
    path = "/api/usage-logs",
    params(UsageLogQuery),
    responses((status = 200, body = [UsageLogResponse])),
    tag = "Usage"
)]
fn list_usage_logs_doc() {}
