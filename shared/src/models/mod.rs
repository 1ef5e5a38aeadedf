//! Domain models shared between server and clients

pub mod order;
pub mod session;
pub mod time_slot;

pub use order::{CreateOrderRequest, Order, OrderItem, OrderItemInput, OrderStatus};
pub use session::Session;
pub use time_slot::{SlotColor, SlotThresholds, TimeSlot};
