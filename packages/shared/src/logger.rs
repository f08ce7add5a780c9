//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `<crate>=<default_level>` is used
/// together with request tracing from `tower_http`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = build_filter(bin_name, default_level);
    let directives = filter.to_string();

    // tests and embedders may already own the global subscriber
    match tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
    {
        Ok(()) => tracing::debug!("Logger initialized (filter: {})", directives),
        Err(e) => tracing::debug!("Keeping the existing subscriber: {}", e),
    }
}

fn build_filter(bin_name: &str, default_level: &str) -> EnvFilter {
    let target = bin_name.replace('-', "_");
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{target}={default_level},tower_http=debug").into())
}
