//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{AuthError, RegistryError};

/// Errors returned while admitting a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmitError {
    #[error("authentication failed: {0}")]
    Unauthenticated(#[from] AuthError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors returned while relaying a broker message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("failed to decode message on '{channel}': {reason}")]
    Decode { channel: String, reason: String },

    #[error("no route for broker channel '{0}'")]
    Unrouted(String),
}

/// Errors returned by the reload trigger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReloadError {
    #[error("unauthorized")]
    Unauthorized,
}
