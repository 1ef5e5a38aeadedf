//! Configuration, application state, and the server runner

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, SlotConfig};
pub use server::Server;
pub use state::AppState;
