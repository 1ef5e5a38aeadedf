//! Shared types for the pickup ordering platform
//!
//! Common types used by the server crate: domain models (orders, sessions,
//! time slots), the unified error system, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
