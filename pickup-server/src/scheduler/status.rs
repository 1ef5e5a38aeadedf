//! Order status state machine
//!
//! Every status mutation routes through [`OrderStatusMachine::validate`]
//! before anything is persisted. There are no raw field setters; the
//! repository exposes a single `update_status` write path and the scheduler
//! is its only caller. No timers advance status automatically — every
//! transition is a staff action.

use shared::error::{AppError, AppResult};
use shared::models::OrderStatus;

pub struct OrderStatusMachine;

impl OrderStatusMachine {
    /// Check that the lifecycle graph permits `current → target`
    pub fn validate(current: OrderStatus, target: OrderStatus) -> AppResult<()> {
        if current.can_transition_to(target) {
            Ok(())
        } else {
            Err(
                AppError::illegal_transition(format!(
                    "cannot move order from {current} to {target}"
                ))
                .with_detail("from", current.as_str())
                .with_detail("to", target.as_str()),
            )
        }
    }
}
