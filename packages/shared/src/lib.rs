//! Shared utilities for the storefront realtime relay.

pub mod logger;
pub mod time;
