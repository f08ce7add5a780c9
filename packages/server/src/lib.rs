//! Realtime event relay.
//!
//! Fans broker events out to role-scoped WebSocket rooms and pushes
//! development reload signals to browser clients.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod service;
pub mod ui;
pub mod usecase;

pub use config::RelayConfig;
pub use service::{RelayService, RunningRelay, ServerError};
