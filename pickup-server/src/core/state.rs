use std::path::PathBuf;
use std::sync::Arc;

use shared::error::AppResult;
use sqlx::SqlitePool;

use crate::auth::{RateLimiter, SessionStore, StaffDirectory};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::scheduler::{OrderAdmissionScheduler, TimeSlotAggregator};

/// Process-wide application state, constructed once at startup and cloned
/// into request handlers. Tests build their own instance and drop it; no
/// implicit singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
    pub sessions: Arc<SessionStore>,
    pub rate_limiter: RateLimiter,
    pub staff: Arc<StaffDirectory>,
}

impl AppState {
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.validate()?;

        let db_path = PathBuf::from(&config.work_dir).join("pickup.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let sessions = Arc::new(SessionStore::new(config.lifetime_bearer_hours));
        let staff = Arc::new(StaffDirectory::new(
            config.admin_username.clone(),
            &config.admin_password,
        )?);

        Ok(Self {
            config: config.clone(),
            db: db_service.pool,
            sessions,
            rate_limiter: RateLimiter::new(),
            staff,
        })
    }

    pub fn order_repository(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    pub fn aggregator(&self) -> TimeSlotAggregator {
        TimeSlotAggregator::new(self.order_repository(), self.config.slot)
    }

    pub fn scheduler(&self) -> OrderAdmissionScheduler {
        OrderAdmissionScheduler::new(self.order_repository(), self.config.slot)
    }
}
