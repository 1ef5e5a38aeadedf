//! Authentication middleware
//!
//! Resolves `Authorization: Bearer <token>` through the session store and
//! injects [`CurrentUser`] into request extensions for staff routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::error::AppError;

use crate::auth::CurrentUser;
use crate::core::AppState;

/// Customer-facing routes that need no session
fn is_public(method: &Method, path: &str) -> bool {
    matches!(
        (method, path),
        (&Method::GET, "/api/health")
            | (&Method::GET, "/api/slots")
            | (&Method::GET, "/api/orders/status")
            | (&Method::POST, "/api/orders")
            | (&Method::POST, "/api/auth/login")
    )
}

/// Authentication middleware — requires a valid staff session
///
/// Applied as a global layer. Skips CORS preflight, non-API paths, and the
/// public customer routes; everything else must present a bearer token that
/// the session store resolves. Missing and expired sessions are rejected
/// identically (401).
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests through
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through (and 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        tracing::warn!(uri = %req.uri(), "Missing authorization header");
        return Err(AppError::not_authenticated());
    };

    match state.sessions.validate(token) {
        Ok(user_id) => {
            let user = CurrentUser {
                user_id,
                token: token.to_owned(),
            };
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), "Session validation failed");
            Err(e)
        }
    }
}
