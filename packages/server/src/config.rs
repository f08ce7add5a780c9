//! Process configuration.
//!
//! Every option can be given on the command line or through the
//! environment variable named next to it.

use std::time::Duration;

use clap::Parser;

use crate::{domain::ReloadSecret, ui::bridge::ReconnectPolicy};

#[derive(Clone, Parser)]
#[command(
    name = "relay-server",
    version,
    about = "Relays broker events to role-scoped WebSocket rooms"
)]
pub struct RelayConfig {
    /// Address to listen on
    #[arg(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 4001)]
    pub port: u16,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Broker channel carrying new-order events
    #[arg(long, env = "ORDERS_CHANNEL", default_value = "orders")]
    pub orders_channel: String,

    /// HMAC key used to verify client tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token signing algorithm (HS256, HS384 or HS512)
    #[arg(long, env = "JWT_ALGORITHM", default_value = "HS256")]
    pub jwt_algorithm: String,

    /// Clock skew tolerated when checking token expiry, in seconds
    #[arg(long, env = "JWT_LEEWAY_SECS", default_value_t = 0)]
    pub jwt_leeway_secs: u64,

    /// Enable the dev channel and the reload trigger
    #[arg(long, env = "DEV_RELOAD")]
    pub dev_reload: bool,

    /// Shared secret required by POST /dev/reload (empty = none)
    #[arg(long, env = "DEV_RELOAD_SECRET", default_value = "", hide_env_values = true)]
    pub dev_reload_secret: String,

    /// First delay before resubscribing to the broker, in milliseconds
    #[arg(long, env = "RECONNECT_INITIAL_MS", default_value_t = 500)]
    pub reconnect_initial_ms: u64,

    /// Upper bound of the resubscribe delay, in milliseconds
    #[arg(long, env = "RECONNECT_MAX_MS", default_value_t = 30_000)]
    pub reconnect_max_ms: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl RelayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn reload_secret(&self) -> ReloadSecret {
        ReloadSecret::new(self.dev_reload_secret.clone())
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_millis(self.reconnect_initial_ms),
            Duration::from_millis(self.reconnect_max_ms),
        )
    }
}
