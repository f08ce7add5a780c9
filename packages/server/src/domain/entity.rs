//! Core domain models for the relay.

use serde::{Deserialize, Serialize};

use super::value_object::{ChannelKind, Claims, ConnectionId, RoomName, Timestamp};

/// Default reload reason when the caller supplies none
pub const DEFAULT_RELOAD_REASON: &str = "change";

/// Default reload source when the caller supplies none
pub const DEFAULT_RELOAD_SOURCE: &str = "unknown";

/// Message name dev clients receive reload events under
pub const RELOAD_EVENT: &str = "reload";

/// An admitted client connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection identifier
    pub id: ConnectionId,
    /// Logical endpoint the client connected through
    pub channel: ChannelKind,
    /// Verified identity; `None` on the dev channel
    pub claims: Option<Claims>,
    /// Rooms this connection belongs to, fixed at admission
    pub rooms: Vec<RoomName>,
    /// Timestamp when the connection was admitted
    pub connected_at: Timestamp,
}

impl Connection {
    /// An authenticated default-channel connection placed in `rooms`.
    pub fn authenticated(
        id: ConnectionId,
        claims: Claims,
        rooms: Vec<RoomName>,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            id,
            channel: ChannelKind::Default,
            claims: Some(claims),
            rooms,
            connected_at,
        }
    }

    /// A dev-channel connection. Dev connections never join rooms.
    pub fn dev(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            channel: ChannelKind::Dev,
            claims: None,
            rooms: Vec::new(),
            connected_at,
        }
    }

    pub fn is_member_of(&self, room: &RoomName) -> bool {
        self.rooms.iter().any(|r| r == room)
    }
}

/// A raw message received from the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    /// Broker channel the message arrived on
    pub channel: String,
    /// Undecoded message body
    pub payload: String,
}

impl BrokerMessage {
    pub fn new(channel: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Payload pushed to dev-channel clients to make them refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadEvent {
    pub reason: String,
    pub source: String,
    pub file: Option<String>,
    /// Server-assigned creation time (milliseconds)
    pub ts: i64,
}

impl ReloadEvent {
    /// Build a reload event, applying defaults for missing or empty fields.
    pub fn new(
        reason: Option<String>,
        source: Option<String>,
        file: Option<String>,
        ts: Timestamp,
    ) -> Self {
        Self {
            reason: non_empty(reason).unwrap_or_else(|| DEFAULT_RELOAD_REASON.to_string()),
            source: non_empty(source).unwrap_or_else(|| DEFAULT_RELOAD_SOURCE.to_string()),
            file: non_empty(file),
            ts: ts.value(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
