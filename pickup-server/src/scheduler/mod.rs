//! Order admission and time-slot capacity scheduling
//!
//! - [`slots`]: epoch-aligned bucketing and the live aggregation window
//! - [`admission`]: the write-path orchestrator (validate → capacity check
//!   → create; batch status; transitions; purge)
//! - [`status`]: the order lifecycle state machine

pub mod admission;
pub mod slots;
pub mod status;

pub use admission::OrderAdmissionScheduler;
pub use slots::TimeSlotAggregator;
pub use status::OrderStatusMachine;
