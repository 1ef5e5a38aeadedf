//! Authentication Routes
//!
//! - `/api/auth/login`: public, guarded by the login rate limiter
//! - `/api/auth/logout`, `/api/auth/me`: require a valid session

use axum::{
    Extension, Json, Router,
    extract::State,
    middleware as axum_middleware,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};

use crate::auth::{CurrentUser, rate_limit};
use crate::core::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        // Public route with its own long low-frequency rate limit window
        .route(
            "/api/auth/login",
            post(login).layer(axum_middleware::from_fn_with_state(
                state.clone(),
                rate_limit::login_rate_limit,
            )),
        )
        // Protected routes - require authentication
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}

/// Login request payload
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Login response with bearer token
#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: UserInfo,
}

/// Staff information returned after login
#[derive(Debug, Serialize)]
struct UserInfo {
    user_id: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let user_id = state.staff.verify(&req.username, &req.password)?;
    let session = state.sessions.create(&user_id);

    tracing::info!(user_id = %user_id, "Staff logged in");

    Ok(ApiResponse::success(LoginResponse {
        token: session.token,
        user: UserInfo { user_id },
    }))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<ApiResponse<()>, AppError> {
    state.sessions.revoke(&user.token);
    tracing::info!(user_id = %user.user_id, "Staff logged out");
    Ok(ApiResponse::ok())
}

async fn me(Extension(user): Extension<CurrentUser>) -> Result<ApiResponse<UserInfo>, AppError> {
    Ok(ApiResponse::success(UserInfo {
        user_id: user.user_id,
    }))
}
