//! Pickup Server — walk-up food ordering admission and scheduling
//!
//! # Module structure
//!
//! ```text
//! pickup-server/src/
//! ├── core/       # Config, state, server runner
//! ├── auth/       # Sessions, staff credentials, rate limiting
//! ├── scheduler/  # Slot aggregation, admission, status machine
//! ├── api/        # HTTP routes and handlers
//! ├── db/         # SQLite pool and repositories
//! └── services/   # Background maintenance
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod scheduler;
pub mod services;

// Re-export public types
pub use auth::{CurrentUser, RateLimiter, SessionStore};
pub use core::{AppState, Config, Server};
pub use scheduler::{OrderAdmissionScheduler, OrderStatusMachine, TimeSlotAggregator};

/// Initialize environment: dotenv and tracing
pub fn setup_environment() {
    dotenv::dotenv().ok();

    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
