//! Domain factories for creating value objects.

use super::ConnectionId;

/// Factory for generating ConnectionId instances.
///
/// Keeps identifier generation apart from the validation in ConnectionId.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}
