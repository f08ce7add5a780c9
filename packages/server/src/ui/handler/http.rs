//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::http::{ReloadRequestDto, ReloadResponseDto},
    ui::state::AppState,
    usecase::{ReloadError, TriggerReloadUseCase},
};

/// Header carrying the reload shared secret
pub const RELOAD_SECRET_HEADER: &str = "x-reload-secret";

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /dev/reload`: broadcast a reload event to every dev-channel client
pub async fn reload_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ReloadResponseDto>) {
    let provided_secret = headers
        .get(RELOAD_SECRET_HEADER)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok());

    let usecase = TriggerReloadUseCase::new(state.registry.clone(), state.reload_secret.clone());

    // Authorize before looking at the body
    if let Err(ReloadError::Unauthorized) = usecase.authorize(provided_secret) {
        tracing::warn!("Rejected reload trigger: secret mismatch");
        return unauthorized();
    }

    let request = match parse_reload_body(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Rejected reload trigger: invalid body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ReloadResponseDto::error("invalid body")),
            );
        }
    };

    match usecase.execute(provided_secret, request).await {
        Ok(_) => (StatusCode::OK, Json(ReloadResponseDto::ok())),
        Err(ReloadError::Unauthorized) => unauthorized(),
    }
}

fn unauthorized() -> (StatusCode, Json<ReloadResponseDto>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ReloadResponseDto::error("unauthorized")),
    )
}

/// Empty bodies and `null` mean "all defaults".
fn parse_reload_body(body: &[u8]) -> Result<ReloadRequestDto, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReloadRequestDto::default());
    }
    let request: Option<ReloadRequestDto> = serde_json::from_slice(body)?;
    Ok(request.unwrap_or_default())
}
