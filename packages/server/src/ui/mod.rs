//! Inbound adapters: the axum router, its WebSocket and HTTP handlers,
//! and the broker bridge.

pub mod bridge;
mod handler;
pub mod router;
pub mod signal;
pub mod state;

pub use bridge::{PubSubBridge, ReconnectPolicy};
pub use router::build_router;
pub use signal::shutdown_signal;
pub use state::AppState;
