//! Server state shared by the handlers.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{ConnectionRegistry, ReloadSecret, RoomPolicy, TokenVerifier};

/// Query parameters for the default-channel WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Connection registry（ゲートウェイのメンバーシップと配信）
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Credential verifier for the default channel
    pub verifier: Arc<dyn TokenVerifier>,
    /// Role → room mapping applied on admission
    pub room_policy: Arc<RoomPolicy>,
    /// Secret guarding POST /dev/reload
    pub reload_secret: ReloadSecret,
    /// Flips to `true` when the service is stopping
    pub shutdown: watch::Receiver<bool>,
}
