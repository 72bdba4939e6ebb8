//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health                  - Liveness check
///   - POST /create-checkout-session - Create hosted checkout, returns `{ url }`
///   - GET  /session-status          - Poll a session by `session_id`
///
/// Anything else is served from `STATIC_DIR` when one is configured.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_origins);
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route("/session-status", get(handlers::session_status))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            if !dir.is_dir() {
                tracing::warn!("STATIC_DIR {} is not a directory", dir.display());
            }
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

/// CORS for the storefront: configured origins only, or any origin when none
/// are configured. Preflight requests are answered by the layer itself.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(allowed))
    }
}
