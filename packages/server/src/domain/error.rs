//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId validation error
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// Role claim is not one of the known roles
    #[error("unrecognized role: {0}")]
    RoleUnrecognized(String),
}

/// Why a credential was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("credential is missing")]
    Missing,

    #[error("credential is malformed")]
    Malformed,

    #[error("credential signature is invalid")]
    SignatureInvalid,

    #[error("credential has expired")]
    Expired,
}

impl AuthError {
    /// Stable, client-facing reason code.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Missing => "missing",
            AuthError::Malformed => "malformed",
            AuthError::SignatureInvalid => "signature-invalid",
            AuthError::Expired => "expired",
        }
    }
}

/// Errors raised by the connection registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
}

/// Errors raised while talking to the message broker
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to connect to broker: {0}")]
    Connect(String),

    #[error("failed to subscribe to {channels:?}: {reason}")]
    Subscribe {
        channels: Vec<String>,
        reason: String,
    },
}
