//! Background maintenance tasks

use std::time::Duration;

use crate::core::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the periodic maintenance loop: expired-session sweeping and
/// rate-limiter window cleanup. Idempotent and safe to run alongside
/// request-time validation; a failed pass is logged and retried on the
/// next tick, never fatal to request handling.
pub fn start_background_tasks(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        // First tick fires immediately; skip it so startup stays quiet
        interval.tick().await;
        loop {
            interval.tick().await;

            let removed = state.sessions.sweep_expired();
            if removed > 0 {
                tracing::info!(removed, "Expired sessions swept");
            }

            state.rate_limiter.cleanup().await;
        }
    });
}
