//! Realtime relay server.
//!
//! Subscribes to the broker and relays order events to admin clients.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... cargo run --bin relay-server -- --dev-reload
//! ```

use clap::Parser;
use relay_server::{RelayConfig, RelayService, ServerError, ui::shutdown_signal};
use relay_shared::logger::setup_logger;

async fn run(config: RelayConfig) -> Result<(), ServerError> {
    let relay = RelayService::from_config(config)?.start().await?;
    shutdown_signal().await;
    relay.stop().await
}

#[tokio::main]
async fn main() {
    let config = RelayConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
