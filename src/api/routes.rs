//! Router configuration for the API.
//!
//! Centralized route registration and middleware configuration.

use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{DefaultPredicate, NotForContentType, Predicate};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    global_error_handler, legacy_error_middleware, logging_middleware, request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Images are served as stored, with their exact `Content-Length`. The
/// default predicate still compresses SVG, so every `image/` type is excluded.
fn compression_predicate() -> impl Predicate {
    DefaultPredicate::new().and(NotForContentType::const_new("image/"))
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS and compression
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
/// 4. Legacy error flattening, only when `api.legacy_errors` is set
/// 5. Global error handler - normalizes framework errors to `ErrorResponse`
/// 6. Timeout and body limit
///
/// # Routes
/// - `/cauza/*` - Cases, pictures and donations
/// - `/users/*` - Donor accounts
/// - `/health*` - Health probes
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let legacy_errors = state.api.legacy_errors;

    let mut router = Router::new()
        .merge(handlers::cauze::cauza_routes())
        .merge(handlers::users::user_routes())
        .merge(handlers::health::health_routes())
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(middleware::from_fn(global_error_handler));

    if legacy_errors {
        router = router.layer(middleware::from_fn(legacy_error_middleware));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
