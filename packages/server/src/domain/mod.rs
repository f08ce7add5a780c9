//! Domain layer for the relay.
//!
//! This module contains the connection model, routing policies and the
//! traits the use cases depend on. It knows nothing about axum, Redis or
//! the JWT library.

pub mod auth;
pub mod broker;
pub mod entity;
pub mod error;
pub mod factory;
pub mod policy;
pub mod registry;
pub mod value_object;

pub use auth::TokenVerifier;
pub use broker::{BrokerConnector, BrokerStream};
pub use entity::{BrokerMessage, Connection, ReloadEvent};
pub use error::{AuthError, BrokerError, RegistryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use policy::{Route, RoomPolicy, RouteTable};
pub use registry::ConnectionRegistry;
pub use value_object::{ChannelKind, Claims, ConnectionId, ReloadSecret, Role, RoomName, Timestamp};

#[cfg(test)]
pub use auth::MockTokenVerifier;
#[cfg(test)]
pub use registry::MockConnectionRegistry;
