//! Connection registry trait.
//!
//! The registry owns the set of admitted connections, their outbound queues
//! and room membership. Implementations must apply every mutation and every
//! broadcast iteration as one atomic step with respect to each other.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use super::{ChannelKind, Connection, ConnectionId, RoomName, error::RegistryError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Admit a connection and join it to `connection.rooms`.
    async fn register(
        &self,
        connection: Connection,
        sender: UnboundedSender<String>,
    ) -> Result<(), RegistryError>;

    /// Drop a connection and release all of its room memberships.
    async fn unregister(&self, id: &ConnectionId) -> Result<Connection, RegistryError>;

    async fn get_connection(&self, id: &ConnectionId) -> Option<Connection>;

    /// Members of `room`, in registration order.
    async fn room_members(&self, room: &RoomName) -> Vec<ConnectionId>;

    async fn count_connections(&self, channel: ChannelKind) -> usize;

    /// Send `payload` as `message_name` to every member of `room`.
    ///
    /// Returns the number of connections the message was queued for.
    /// Closed transports are skipped silently.
    async fn broadcast_to_room(&self, room: &RoomName, message_name: &str, payload: &Value)
    -> usize;

    /// Send `payload` as `message_name` to every connection on `channel`.
    async fn broadcast_to_channel(
        &self,
        channel: ChannelKind,
        message_name: &str,
        payload: &Value,
    ) -> usize;
}
