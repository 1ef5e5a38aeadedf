//! Authentication and request admission
//!
//! - [`SessionStore`]: opaque bearer tokens with fixed expiry
//! - [`StaffDirectory`]: argon2-backed credential verification
//! - [`RateLimiter`]: sliding-window request admission per client
//! - [`require_auth`]: axum middleware gating staff routes

pub mod middleware;
pub mod rate_limit;
pub mod session;
pub mod staff;

pub use middleware::require_auth;
pub use rate_limit::{Admission, RateLimiter};
pub use session::SessionStore;
pub use staff::StaffDirectory;

/// Authenticated staff identity, injected into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    /// The bearer token the request presented (needed for logout)
    pub token: String,
}
