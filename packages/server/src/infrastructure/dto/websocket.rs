//! WebSocket message DTOs for the relay.
//!
//! Every frame sent to a client is a JSON text frame of the form
//! `{"event": <message name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::domain::{ChannelKind, Connection};

/// Sent once a connection has been admitted
pub const CONNECTED_EVENT: &str = "connected";

/// Sent right before closing a connection that failed authentication
pub const CONNECT_ERROR_EVENT: &str = "connect_error";

/// Close code used after a failed authentication
pub const UNAUTHORIZED_CLOSE_CODE: u16 = 4401;

/// Outbound event envelope
#[derive(Debug, Serialize)]
pub struct EventEnvelope<'a, T: Serialize> {
    pub event: &'a str,
    pub data: &'a T,
}

/// Encode `data` under `event` as a text frame body.
pub fn encode_event<T: Serialize>(event: &str, data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EventEnvelope { event, data })
}

/// Payload of the `connected` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub id: String,
    pub channel: ChannelKind,
    pub rooms: Vec<String>,
}

impl From<&Connection> for ConnectedPayload {
    fn from(connection: &Connection) -> Self {
        Self {
            id: connection.id.as_str().to_string(),
            channel: connection.channel,
            rooms: connection
                .rooms
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
    }
}

/// Payload of the `connect_error` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectErrorPayload {
    pub message: String,
    /// One of `missing`, `malformed`, `signature-invalid`, `expired`
    pub reason: String,
}

impl ConnectErrorPayload {
    pub fn unauthorized(reason: &str) -> Self {
        Self {
            message: "unauthorized".to_string(),
            reason: reason.to_string(),
        }
    }
}
