//! Wire DTOs.

pub mod http;
pub mod websocket;
