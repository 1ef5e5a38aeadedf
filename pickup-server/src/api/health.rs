//! Health Routes

use axum::{Router, routing::get};
use shared::error::ApiResponse;

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> ApiResponse<()> {
    ApiResponse::ok()
}
