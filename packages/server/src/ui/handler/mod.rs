//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{health_check, reload_handler};

// Re-export WebSocket handlers
pub use websocket::{default_ws_handler, dev_ws_handler};
