//! Router assembly shared by the server binary and the integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc, handlers, middleware as auth_middleware, state::AppState,
    utils::storage::PUBLIC_UPLOAD_PREFIX,
};

pub fn build_router(state: AppState) -> Router {
    // Customer-facing and anonymous routes
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/sessions/{token}",
            get(handlers::qr_sessions::redeem_session),
        )
        .route(
            "/api/customer-sessions/{id}",
            get(handlers::customer_sessions::get_status),
        )
        .route(
            "/api/customer-sessions/{id}/photo",
            post(handlers::customer_sessions::upload_photo),
        )
        .route(
            "/api/customer-sessions/{id}/history",
            get(handlers::customer_sessions::get_history),
        )
        .route(
            "/api/stores/{id}/items",
            get(handlers::customer_sessions::list_store_items),
        )
        .route("/api/tryon", post(handlers::try_on::request_try_on));

    // Any authenticated staff member, including those with a pending password reset
    let staff_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/auth/change-password",
            put(handlers::auth::change_password),
        )
        .route(
            "/api/usage-logs",
            get(handlers::usage_logs::list_usage_logs),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth,
        ));

    let owner_routes = Router::new()
        .route(
            "/api/stores",
            get(handlers::stores::list_stores).post(handlers::stores::create_store),
        )
        .route("/api/stores/{id}", put(handlers::stores::update_store))
        .route(
            "/api/stores/{id}/manager/reset-password",
            post(handlers::stores::reset_manager_password),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_owner,
        ));

    let manager_routes = Router::new()
        .route(
            "/api/sessions",
            get(handlers::qr_sessions::list_sessions).post(handlers::qr_sessions::issue_session),
        )
        .route(
            "/api/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route("/api/items/{id}", put(handlers::items::update_item))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_manager,
        ));

    let uploads = ServeDir::new(state.config.upload_dir.clone());

    Router::new()
        .merge(public_routes)
        .merge(staff_routes)
        .merge(owner_routes)
        .merge(manager_routes)
        .nest_service(PUBLIC_UPLOAD_PREFIX, uploads)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allow_origins))
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
