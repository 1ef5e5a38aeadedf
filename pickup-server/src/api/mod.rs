//! HTTP routes and middleware stack

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth;
use crate::core::AppState;

pub mod auth_routes;
pub mod health;
pub mod orders;
pub mod slots;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        // Ordering API - customer submission public, staff mutation protected
        .merge(orders::router())
        // Slot aggregation API - public read path
        .merge(slots::router())
        // Auth API - login rate-limited separately
        .merge(auth_routes::router(state))
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &AppState) -> Router<AppState> {
    build_router(state)
        // CORS - the ordering page is served from a separate origin
        .layer(CorsLayer::permissive())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Session authentication - injects CurrentUser on staff routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        // General API admission - short high-frequency window
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::api_rate_limit,
        ))
}
