//! Route table.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{handler, state::AppState};

/// Build the relay router.
///
/// The dev routes (`/dev/ws`, `/dev/reload`) are only mounted when
/// `dev_reload` is set; otherwise they answer 404.
pub fn build_router(state: Arc<AppState>, dev_reload: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handler::health_check))
        .route("/ws", get(handler::default_ws_handler));

    if dev_reload {
        router = router
            .route("/dev/ws", get(handler::dev_ws_handler))
            .route("/dev/reload", post(handler::reload_handler));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
