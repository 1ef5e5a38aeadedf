use shared::error::{AppError, AppResult};
use shared::models::SlotThresholds;

/// Slot aggregation and admission configuration
#[derive(Debug, Clone, Copy)]
pub struct SlotConfig {
    pub slot_width_minutes: u32,
    pub past_slots_to_show: u32,
    pub future_slots_to_show: u32,
    pub thresholds: SlotThresholds,
}

impl SlotConfig {
    /// Slot width in milliseconds
    pub fn width_ms(&self) -> i64 {
        self.slot_width_minutes as i64 * 60_000
    }
}

/// Server configuration, loaded from the environment with defaults
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub environment: String,

    // Slot scheduling
    pub slot: SlotConfig,

    // Sessions
    pub lifetime_bearer_hours: u64,

    // Rate limiting: a short high-frequency window guards the main API,
    // a longer low-frequency window guards login
    pub login_rate_limit: u32,
    pub login_rate_window_ms: i64,
    pub api_rate_limit: u32,
    pub api_rate_window_ms: i64,

    // Staff credentials
    pub admin_username: String,
    pub admin_password: String,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or(defaults.work_dir),
            http_port: env_parse("HTTP_PORT", defaults.http_port),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            slot: SlotConfig {
                slot_width_minutes: env_parse(
                    "SLOT_WIDTH_MINUTES",
                    defaults.slot.slot_width_minutes,
                ),
                past_slots_to_show: env_parse(
                    "PAST_SLOTS_TO_SHOW",
                    defaults.slot.past_slots_to_show,
                ),
                future_slots_to_show: env_parse(
                    "FUTURE_SLOTS_TO_SHOW",
                    defaults.slot.future_slots_to_show,
                ),
                thresholds: SlotThresholds {
                    warning: env_parse("SLOT_WARNING_THRESHOLD", defaults.slot.thresholds.warning),
                    critical: env_parse(
                        "SLOT_CRITICAL_THRESHOLD",
                        defaults.slot.thresholds.critical,
                    ),
                    max: env_parse("SLOT_MAX_THRESHOLD", defaults.slot.thresholds.max),
                },
            },
            lifetime_bearer_hours: env_parse(
                "LIFETIME_BEARER_HOURS",
                defaults.lifetime_bearer_hours,
            ),
            login_rate_limit: env_parse("LOGIN_RATE_LIMIT", defaults.login_rate_limit),
            login_rate_window_ms: env_parse("LOGIN_RATE_WINDOW_MS", defaults.login_rate_window_ms),
            api_rate_limit: env_parse("API_RATE_LIMIT", defaults.api_rate_limit),
            api_rate_window_ms: env_parse("API_RATE_WINDOW_MS", defaults.api_rate_window_ms),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }

    /// Reject configurations the scheduler cannot honor
    pub fn validate(&self) -> AppResult<()> {
        let t = &self.slot.thresholds;
        if self.slot.slot_width_minutes == 0 {
            return Err(AppError::config("SLOT_WIDTH_MINUTES must be positive"));
        }
        if t.warning == 0 || t.critical == 0 || t.max == 0 {
            return Err(AppError::config("slot thresholds must be positive"));
        }
        if t.warning > t.critical {
            return Err(AppError::config(format!(
                "SLOT_WARNING_THRESHOLD ({}) must not exceed SLOT_CRITICAL_THRESHOLD ({})",
                t.warning, t.critical
            )));
        }
        if self.lifetime_bearer_hours == 0 {
            return Err(AppError::config("LIFETIME_BEARER_HOURS must be positive"));
        }
        if self.login_rate_limit == 0 || self.api_rate_limit == 0 {
            return Err(AppError::config("rate limits must be positive"));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/pickup".into(),
            http_port: 3000,
            environment: "development".into(),
            slot: SlotConfig {
                slot_width_minutes: 15,
                past_slots_to_show: 1,
                future_slots_to_show: 8,
                thresholds: SlotThresholds {
                    warning: 5,
                    critical: 8,
                    max: 10,
                },
            },
            lifetime_bearer_hours: 12,
            login_rate_limit: 5,
            login_rate_window_ms: 60_000,
            api_rate_limit: 60,
            api_rate_window_ms: 10_000,
            admin_username: "admin".into(),
            admin_password: "admin".into(),
        }
    }
}
