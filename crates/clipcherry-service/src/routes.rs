//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    accounts, assets, content, health, method_not_found, purchases, subscriptions,
};
use crate::state::AppState;

/// Maximum concurrent requests for `/api` endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `POST /api/register` - Create a user
/// - `POST /api/login` - Open a session
/// - `GET /api/content` - Public gallery
///
/// ## Session auth (`Authorization: Bearer <token>`)
/// - `POST /api/content` - Create content
/// - `GET /api/my-content` - Caller's content, private included
/// - `GET /api/subscriptions` - Caller's subscriptions
/// - `POST /api/subscriptions` - Subscribe to a creator
/// - `POST /api/purchase` - Create a pending order
/// - `GET /api/purchase/:id` - Order status
///
/// ## Static
/// - Everything else is served from the asset upstream, or 404.
///
/// A known path hit with the wrong method is a JSON 404, not a 405.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Accounts
        .route("/register", post(accounts::register).fallback(method_not_found))
        .route("/login", post(accounts::login).fallback(method_not_found))
        // Content
        .route(
            "/content",
            get(content::list_content)
                .post(content::create_content)
                .fallback(method_not_found),
        )
        .route("/my-content", get(content::list_my_content).fallback(method_not_found))
        // Subscriptions
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions)
                .post(subscriptions::create_subscription)
                .fallback(method_not_found),
        )
        // Purchases
        .route(
            "/purchase",
            post(purchases::create_purchase).fallback(method_not_found),
        )
        .route(
            "/purchase/:id",
            get(purchases::get_purchase_status).fallback(method_not_found),
        )
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health).fallback(method_not_found))
        .nest("/api", api_routes)
        .fallback(assets::serve_static)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
